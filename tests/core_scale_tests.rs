use approx::assert_relative_eq;
use chrono::{DateTime, TimeZone, Utc};
use eth_charts::ChartError;
use eth_charts::core::{BandScale, LinearScale, Margins, PlotArea, TimeScale, ValueScale, Viewport};
use eth_charts::data::{TimeSeries, TimeSeriesPoint};

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid date")
}

fn series(name: &str, days: &[(DateTime<Utc>, f64)]) -> TimeSeries {
    TimeSeries::from_points(
        name,
        days.iter()
            .map(|(time, value)| TimeSeriesPoint::new(*time).with_metric("Close", *value))
            .collect(),
    )
}

#[test]
fn linear_scale_maps_and_inverts() {
    let scale = LinearScale::new((0.0, 100.0), (50.0, 770.0)).expect("valid scale");
    assert_relative_eq!(scale.domain_to_pixel(50.0).expect("to pixel"), 410.0);
    assert_relative_eq!(scale.pixel_to_domain(410.0).expect("from pixel"), 50.0);
}

#[test]
fn linear_scale_rejects_empty_domain_and_non_finite_input() {
    assert!(matches!(
        LinearScale::new((5.0, 5.0), (0.0, 1.0)),
        Err(ChartError::DegenerateDomain(_))
    ));
    let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0)).expect("valid scale");
    assert!(matches!(
        scale.domain_to_pixel(f64::NAN),
        Err(ChartError::InvalidValue { .. })
    ));
}

#[test]
fn plot_area_subtracts_margins() {
    let plot = PlotArea::new(Viewport::new(800, 400), Margins::default()).expect("plot");
    assert_eq!(plot.x_range(), (50.0, 770.0));
    assert_eq!(plot.y_range(), (360.0, 20.0));
    assert!(PlotArea::new(Viewport::new(0, 400), Margins::default()).is_err());
    assert!(matches!(
        PlotArea::new(Viewport::new(60, 400), Margins::default()),
        Err(ChartError::Config(_))
    ));
}

#[test]
fn time_scale_endpoints_hit_the_range_edges() {
    let scale = TimeScale::new(day(2021, 1, 1), day(2022, 1, 1), (50.0, 770.0)).expect("scale");
    assert_relative_eq!(scale.scale(day(2021, 1, 1)), 50.0);
    assert_relative_eq!(scale.scale(day(2022, 1, 1)), 770.0);
    assert_eq!(scale.invert(770.0).expect("invert"), day(2022, 1, 1));
}

#[test]
fn time_scale_needs_two_distinct_timestamps() {
    let single = TimeScale::from_timestamps([day(2021, 1, 1)], (0.0, 100.0));
    assert!(matches!(single, Err(ChartError::DegenerateDomain(_))));

    let repeated = TimeScale::from_timestamps([day(2021, 1, 1), day(2021, 1, 1)], (0.0, 100.0));
    assert!(matches!(repeated, Err(ChartError::DegenerateDomain(_))));

    let empty = TimeScale::from_timestamps(std::iter::empty(), (0.0, 100.0));
    assert!(matches!(empty, Err(ChartError::DegenerateDomain(_))));
}

#[test]
fn time_scale_covers_the_union_of_series() {
    let eth = series("ETH", &[(day(2020, 1, 1), 1.0), (day(2020, 6, 1), 2.0)]);
    let sol = series("SOL", &[(day(2020, 3, 1), 1.0), (day(2021, 1, 1), 2.0)]);
    let empty = TimeSeries::from_points("empty", Vec::new());

    let scale = TimeScale::from_series(&[&eth, &sol, &empty], (0.0, 100.0)).expect("scale");
    assert_eq!(scale.domain(), (day(2020, 1, 1), day(2021, 1, 1)));
}

#[test]
fn year_ticks_fall_on_january_first() {
    let scale = TimeScale::new(day(2019, 6, 1), day(2022, 3, 1), (0.0, 1000.0)).expect("scale");
    let years: Vec<DateTime<Utc>> = scale.year_ticks().into_iter().map(|(t, _)| t).collect();
    assert_eq!(years, [day(2020, 1, 1), day(2021, 1, 1), day(2022, 1, 1)]);

    let aligned = TimeScale::new(day(2020, 1, 1), day(2021, 1, 1), (0.0, 1000.0)).expect("scale");
    let ticks = aligned.year_ticks();
    assert_eq!(ticks.len(), 2);
    assert_relative_eq!(ticks[0].1, 0.0);
    assert_relative_eq!(ticks[1].1, 1000.0);
}

#[test]
fn value_scale_is_zero_based_and_niced() {
    let scale = ValueScale::from_values([730.37, 1234.56, 975.51], (360.0, 20.0)).expect("scale");
    assert_eq!(scale.domain(), (0.0, 1300.0));
    assert_relative_eq!(scale.data_max(), 1234.56);
    assert_relative_eq!(scale.scale(0.0).expect("zero"), 360.0);
    assert_relative_eq!(scale.scale(1300.0).expect("top"), 20.0);
}

#[test]
fn value_scale_ignores_gaps_when_fitting_but_rejects_them_when_mapping() {
    let scale = ValueScale::from_values([f64::NAN, 10.0, 40.0, f64::INFINITY], (100.0, 0.0))
        .expect("scale");
    assert_eq!(scale.domain(), (0.0, 40.0));
    assert!(matches!(
        scale.scale(f64::NAN),
        Err(ChartError::InvalidValue { .. })
    ));
}

#[test]
fn value_scale_degenerate_inputs_are_reported() {
    for values in [vec![], vec![5.0], vec![3.0, 3.0, 3.0], vec![-4.0, -1.0], vec![f64::NAN; 4]] {
        assert!(
            matches!(
                ValueScale::from_values(values.clone(), (100.0, 0.0)),
                Err(ChartError::DegenerateDomain(_))
            ),
            "{values:?}"
        );
    }
}

#[test]
fn value_ticks_are_round_numbers() {
    let scale = ValueScale::with_max(4800.0, (400.0, 0.0), 10).expect("scale");
    assert_eq!(scale.domain(), (0.0, 5000.0));
    let ticks: Vec<f64> = scale.ticks(10).into_iter().map(|(v, _)| v).collect();
    assert_eq!(ticks.len(), 11);
    assert_eq!(ticks.first(), Some(&0.0));
    assert_eq!(ticks.last(), Some(&5000.0));
    assert_relative_eq!(ticks[1], 500.0);
}

#[test]
fn band_scale_pads_between_and_around_bands() {
    let bands = BandScale::new(["a", "b", "c"], (0.0, 330.0), 0.3).expect("band");
    // step = 330 / (3 - 0.3 + 0.6) = 100
    assert_relative_eq!(bands.step(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(bands.bandwidth(), 70.0, epsilon = 1e-9);
    assert_relative_eq!(bands.band_at(0).expect("a"), 30.0, epsilon = 1e-9);
    assert_eq!(bands.label_at(135.0), Some("b"));
    assert_eq!(bands.label_at(115.0), None);
    assert_eq!(bands.index_at(250.0), Some(2));
}
