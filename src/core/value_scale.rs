use ordered_float::OrderedFloat;
use tracing::trace;

use crate::core::LinearScale;
use crate::core::nice::{self, DEFAULT_TICK_COUNT};
use crate::data::TimeSeries;
use crate::error::{ChartError, ChartResult};

/// Quantity axis pinned at zero: domain `[0, nice(max)]`.
///
/// Prices, fees and volumes are non-negative, so the lower bound never
/// follows the data. Non-finite samples are ignored when fitting and rejected
/// when mapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    linear: LinearScale,
    data_max: f64,
}

impl ValueScale {
    /// Fits the scale to `values` with the default nice tick count.
    pub fn from_values<I>(values: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        Self::from_values_with_ticks(values, range, DEFAULT_TICK_COUNT)
    }

    /// Fits the scale to `values`, rounding the upper bound for `tick_count` ticks.
    ///
    /// Fails with [`ChartError::DegenerateDomain`] when fewer than two finite
    /// values remain, when they are all equal, or when the maximum is not
    /// positive.
    pub fn from_values_with_ticks<I>(
        values: I,
        range: (f64, f64),
        tick_count: usize,
    ) -> ChartResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut finite = 0_usize;
        let mut skipped = 0_usize;
        let mut min: Option<OrderedFloat<f64>> = None;
        let mut max: Option<OrderedFloat<f64>> = None;
        for value in values {
            if !value.is_finite() {
                skipped += 1;
                continue;
            }
            finite += 1;
            let value = OrderedFloat(value);
            min = Some(min.map_or(value, |m| m.min(value)));
            max = Some(max.map_or(value, |m| m.max(value)));
        }
        if skipped > 0 {
            trace!(skipped, finite, "excluded non-finite values from value extent");
        }

        let (Some(OrderedFloat(min)), Some(OrderedFloat(max))) = (min, max) else {
            return Err(ChartError::DegenerateDomain(
                "value scale needs at least two finite values, got none".to_owned(),
            ));
        };
        if finite < 2 {
            return Err(ChartError::DegenerateDomain(format!(
                "value scale needs at least two finite values, got {finite}"
            )));
        }
        if min == max {
            return Err(ChartError::DegenerateDomain(format!(
                "all {finite} values equal {max}"
            )));
        }
        if max <= 0.0 {
            return Err(ChartError::DegenerateDomain(format!(
                "zero-based value scale needs a positive maximum, got {max}"
            )));
        }

        Self::with_max(max, range, tick_count)
    }

    /// Shared value axis over several metrics of several series.
    pub fn from_series_metrics(
        series: &[&TimeSeries],
        metrics: &[&str],
        range: (f64, f64),
    ) -> ChartResult<Self> {
        Self::from_values(
            series.iter().flat_map(|s| {
                s.points().iter().flat_map(move |point| {
                    metrics
                        .iter()
                        .map(move |metric| point.metric(metric).unwrap_or(f64::NAN))
                })
            }),
            range,
        )
    }

    /// Builds `[0, nice(max)]` directly from a known positive maximum.
    pub fn with_max(max: f64, range: (f64, f64), tick_count: usize) -> ChartResult<Self> {
        if !max.is_finite() || max <= 0.0 {
            return Err(ChartError::DegenerateDomain(format!(
                "zero-based value scale needs a finite positive maximum, got {max}"
            )));
        }
        let upper = nice::nice_upper_bound(max, tick_count.max(1));
        Ok(Self {
            linear: LinearScale::new((0.0, upper), range)?,
            data_max: max,
        })
    }

    /// Same pixel range over the value window `[lo, hi]`.
    pub(crate) fn with_window(self, lo: f64, hi: f64) -> ChartResult<Self> {
        Ok(Self {
            linear: LinearScale::new((lo, hi), self.linear.range())?,
            data_max: self.data_max,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    /// Largest finite sample seen while fitting, before nicing.
    #[must_use]
    pub fn data_max(self) -> f64 {
        self.data_max
    }

    pub fn scale(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::invalid_value(
                "value",
                format!("cannot place non-finite value {value} on a value axis"),
            ));
        }
        Ok(self.linear.project(value))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<f64> {
        self.linear.pixel_to_domain(pixel)
    }

    /// Round tick values across the domain, each paired with its pixel.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<(f64, f64)> {
        let (lo, hi) = self.linear.domain();
        nice::ticks(lo, hi, count)
            .into_iter()
            .map(|value| (value, self.linear.project(value)))
            .collect()
    }
}
