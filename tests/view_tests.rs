use approx::assert_relative_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use eth_charts::ChartError;
use eth_charts::api::{ChartConfig, SeriesLayer, TimeSeriesView, ValueFormat, ZOOM_EXTENT};
use eth_charts::format::DateStyle;
use eth_charts::data::{TimeSeries, TimeSeriesPoint};
use eth_charts::render::{Color, NullRenderer};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 1, d, 0, 0, 0)
        .single()
        .expect("valid date")
}

fn closes(name: &str, rows: &[(u32, f64)]) -> TimeSeries {
    TimeSeries::from_points(
        name,
        rows.iter()
            .map(|(d, close)| {
                TimeSeriesPoint::new(day(*d))
                    .with_metric("Close", *close)
                    .with_metric("Volume", close * 1000.0)
            })
            .collect(),
    )
}

fn eth() -> TimeSeries {
    closes("ETH", &[(1, 730.37), (2, 774.53), (3, 975.51)])
}

fn sol() -> TimeSeries {
    closes("SOL", &[(2, 1.84), (3, 2.03), (4, 2.52)])
}

fn combined_layers() -> Vec<SeriesLayer> {
    vec![
        SeriesLayer::line("ETH", eth(), "Close", Color::STEEL_BLUE),
        SeriesLayer::line("SOL", sol(), "Close", Color::ORANGE),
    ]
}

fn view() -> TimeSeriesView<NullRenderer> {
    TimeSeriesView::new(NullRenderer::default(), ChartConfig::default()).expect("view")
}

#[test]
fn empty_view_renders_nothing_and_ignores_hover() {
    let mut view = view();
    assert!(!view.has_data());
    assert!(view.pointer_move(400.0, 200.0).is_none());

    let frame = view.build_frame().expect("frame");
    assert!(frame.is_empty());

    view.render().expect("render");
    let renderer = view.into_renderer();
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_line_count, 0);
}

#[test]
fn combined_view_shares_time_and_value_axes() {
    let mut view = view();
    view.set_layers(combined_layers()).expect("commit");

    let scales = view.scales().expect("scales");
    assert_eq!(scales.time.domain(), (day(1), day(4)));
    assert_eq!(scales.value.domain(), (0.0, 1000.0));

    view.render().expect("render");
    let renderer = view.renderer();
    // Two segments per layer plus axes and ticks.
    assert!(renderer.last_line_count >= 4 + 2);
    // Legend swatches for both layers.
    assert_eq!(renderer.last_circle_count, 2);
}

#[test]
fn hover_reports_nearest_sample_of_every_layer() {
    let mut view = view();
    view.set_layers(combined_layers()).expect("commit");
    let x = view.scales().expect("scales").time.scale(day(2)) + 3.0;

    let hover = view.pointer_move(x, 200.0).expect("hover");
    assert_eq!(hover.matches.len(), 2);
    assert!(hover.matches.iter().all(|m| m.timestamp == day(2)));
    assert_eq!(hover.matches[0].value, Some(774.53));
    assert_eq!(hover.tooltip.title, "January 2, 2021");

    let rows: Vec<(&str, &str)> = hover
        .tooltip
        .rows
        .iter()
        .map(|row| (row.label.as_str(), row.value.as_str()))
        .collect();
    assert_eq!(rows, [("ETH", "$774.53"), ("SOL", "$1.84")]);

    view.pointer_leave();
    assert!(view.hover().is_none());
}

#[test]
fn hover_outside_the_plot_area_is_ignored() {
    let mut view = view();
    view.set_layers(combined_layers()).expect("commit");
    assert!(view.pointer_move(10.0, 200.0).is_none());
    assert!(view.pointer_move(400.0, 395.0).is_none());
}

#[test]
fn detail_fields_replace_the_single_value_row() {
    let mut view = view();
    let layer = SeriesLayer::line("ETH", eth(), "Close", Color::STEEL_BLUE)
        .with_detail("Close", "Close", ValueFormat::Usd)
        .with_detail("Volume", "Volume", ValueFormat::Grouped);
    view.set_layers(vec![layer]).expect("commit");

    let x = view.plot_area().right;
    let hover = view.pointer_move(x, 100.0).expect("hover");
    let labels: Vec<&str> = hover.tooltip.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Close", "Volume"]);
    assert_eq!(hover.tooltip.rows[1].value, "975,510");
}

#[test]
fn tooltip_flips_near_the_right_edge() {
    let mut view = view();
    view.set_layers(combined_layers()).expect("commit");
    let right = view.plot_area().right;
    let hover = view.pointer_move(right - 5.0, 200.0).expect("hover");
    assert!(hover.placement.flipped_left);
    assert_relative_eq!(hover.placement.x, right - 5.0 - 210.0);
}

#[test]
fn stale_load_cannot_overwrite_a_newer_one() {
    let mut view = view();
    let slow = view.begin_load();
    let fast = view.begin_load();

    assert!(view.commit(fast, combined_layers()).expect("commit"));
    let old = closes("OLD", &[(1, 1.0), (9, 2.0)]);
    let stale = vec![SeriesLayer::line("OLD", old, "Close", Color::GREEN)];
    assert!(!view.commit(slow, stale).expect("stale commit is not an error"));

    let labels: Vec<&str> = view.layers().iter().map(|l| l.label.as_str()).collect();
    assert_eq!(labels, ["ETH", "SOL"]);
}

#[test]
fn degenerate_dataset_clears_the_view() {
    let mut view = view();
    view.set_layers(combined_layers()).expect("commit");

    let one = closes("ONE", &[(1, 5.0)]);
    let single = vec![SeriesLayer::line("ONE", one, "Close", Color::GREEN)];
    let err = view.set_layers(single).expect_err("degenerate");
    assert!(matches!(err, ChartError::DegenerateDomain(_)));
    assert!(!view.has_data());
    assert!(view.build_frame().expect("frame").is_empty());
    assert!(view.pointer_move(400.0, 200.0).is_none());
}

#[test]
fn hovered_scatter_sample_is_enlarged() {
    let mut view = view();
    let gas = TimeSeries::from_points(
        "gas",
        (1..=5)
            .map(|d| TimeSeriesPoint::new(day(d)).with_metric("Mean", f64::from(d) * 10.0))
            .collect(),
    );
    view.set_layers(vec![SeriesLayer::scatter("Mean", gas, "Mean", Color::GREEN)])
        .expect("commit");

    let frame = view.build_frame().expect("frame");
    assert_eq!(frame.circles.len(), 5);
    assert!(frame.circles.iter().all(|c| c.radius == 3.0));

    let x = view.scales().expect("scales").time.scale(day(3));
    let hover = view.pointer_move(x, 200.0).expect("hover");
    assert_eq!(hover.tooltip.rows[0].value, "30.00");

    let frame = view.build_frame().expect("frame");
    let enlarged: Vec<_> = frame.circles.iter().filter(|c| c.radius == 6.0).collect();
    assert_eq!(enlarged.len(), 1);
    assert_relative_eq!(enlarged[0].cx, x);
    assert_relative_eq!(enlarged[0].fill.alpha, 1.0);
}

#[test]
fn gaps_break_lines_without_reaching_the_renderer() {
    let mut view = view();
    let gappy = TimeSeries::from_points(
        "gappy",
        vec![
            TimeSeriesPoint::new(day(1)).with_metric("Close", 10.0),
            TimeSeriesPoint::new(day(2)).with_metric("Close", f64::NAN),
            TimeSeriesPoint::new(day(3)).with_metric("Close", 30.0),
            TimeSeriesPoint::new(day(4)).with_metric("Close", 40.0),
        ],
    );
    view.set_layers(vec![SeriesLayer::line("G", gappy, "Close", Color::PURPLE)])
        .expect("commit");

    let frame = view.build_frame().expect("frame");
    let data_lines = frame
        .lines
        .iter()
        .filter(|line| line.color == Color::PURPLE)
        .count();
    assert_eq!(data_lines, 1);
    view.render().expect("frame validates");
}

#[test]
fn tooltip_date_style_follows_the_config() {
    let config = ChartConfig::default().with_tooltip_date(DateStyle::Iso);
    let mut view = TimeSeriesView::new(NullRenderer::default(), config).expect("view");
    view.set_layers(combined_layers()).expect("commit");
    let x = view.scales().expect("scales").time.scale(day(2));

    let hover = view.pointer_move(x, 200.0).expect("hover");
    assert_eq!(hover.tooltip.title, "2021-01-02");
}

#[test]
fn zoom_level_is_clamped_to_the_zoom_extent() {
    let mut view = view();
    assert_eq!(view.zoom(2.0, 400.0).expect("zoom without data"), 1.0);

    view.set_layers(combined_layers()).expect("commit");
    assert_eq!(view.zoom(10.0, 400.0).expect("zoom"), ZOOM_EXTENT.1);
    assert_eq!(view.zoom(3.0, 400.0).expect("zoom"), ZOOM_EXTENT.1);
    assert_eq!(view.zoom(0.01, 400.0).expect("zoom"), ZOOM_EXTENT.0);
    assert_eq!(view.scales(), view.base_scales());

    assert!(view.zoom(0.0, 400.0).is_err());
    assert!(view.zoom(2.0, f64::NAN).is_err());
}

#[test]
fn zoom_keeps_the_anchor_timestamp_and_the_base_scales() {
    let mut view = view();
    view.set_layers(combined_layers()).expect("commit");
    let base = view.base_scales().expect("base");
    let anchor_x = 437.0;
    let before = base.time.invert(anchor_x).expect("before");

    assert_eq!(view.zoom(2.0, anchor_x).expect("zoom"), 2.0);
    let zoomed = view.scales().expect("zoomed");
    let after = zoomed.time.invert(anchor_x).expect("after");
    assert!((after - before).num_milliseconds().abs() <= 1);

    let (start, end) = zoomed.time.domain();
    let (base_start, base_end) = base.time.domain();
    assert!((((end - start) * 2) - (base_end - base_start)).num_milliseconds().abs() <= 2);
    assert_eq!(zoomed.value.domain(), (0.0, 500.0));

    assert_eq!(view.base_scales(), Some(base));
    assert!(view.reset_zoom());
    assert!(!view.reset_zoom());
    assert_eq!(view.scales(), Some(base));
}

#[test]
fn hover_after_zoom_resolves_against_the_rescaled_axis() {
    let mut view = view();
    view.set_layers(combined_layers()).expect("commit");
    let base = view.base_scales().expect("base");
    let plot = view.plot_area();

    // One day visible, starting 16:00 on January 1st.
    let anchor_x = base.time.scale(day(2));
    let anchor_y = base.value.scale(774.53).expect("anchor y");
    assert_eq!(view.zoom_at(3.0, anchor_x, anchor_y).expect("zoom"), 3.0);
    let zoomed = view.scales().expect("zoomed");

    // Seven hours after January 2nd on the zoomed axis, closer to the 3rd
    // on the committed one.
    let x = 500.0;
    assert!(base.time.invert(x).expect("committed time") > day(2) + Duration::hours(12));
    let hover = view.pointer_move(x, 200.0).expect("hover");
    assert!(hover.matches.iter().all(|m| m.timestamp == day(2)));
    assert_relative_eq!(hover.matches[0].x, zoomed.time.scale(day(2)));

    // Marks outside the window are clipped away, the rest stays on the plot.
    view.pointer_leave();
    let frame = view.build_frame().expect("frame");
    let eth_lines: Vec<_> = frame
        .lines
        .iter()
        .filter(|line| line.color == Color::STEEL_BLUE)
        .collect();
    assert!(!eth_lines.is_empty());
    for line in eth_lines {
        for (x, y) in [(line.x1, line.y1), (line.x2, line.y2)] {
            assert!(plot.inflate(1e-3).contains(x, y), "({x}, {y}) escapes the plot");
        }
    }
}

#[test]
fn recommitting_the_same_dataset_keeps_the_zoom() {
    let mut view = view();
    view.set_layers(combined_layers()).expect("commit");
    view.zoom(2.0, 400.0).expect("zoom");
    let zoomed = view.scales();

    let same: Vec<SeriesLayer> = view.layers().to_vec();
    view.set_layers(same).expect("recommit");
    assert_eq!(view.zoom_level(), 2.0);
    assert_eq!(view.scales(), zoomed);

    view.set_layers(vec![SeriesLayer::line("SOL", sol(), "Close", Color::ORANGE)])
        .expect("new dataset");
    assert_eq!(view.zoom_level(), 1.0);
}
