//! Nearest-sample lookup for hover feedback.
//!
//! Rule: bisect to `i` with `key[i-1] <= probe < key[i]`, then take the
//! strictly closer neighbour; equal gaps pick the earlier sample. Probes
//! outside the series clamp to its first or last sample.

use chrono::{DateTime, Utc};
use smallvec::SmallVec;

use crate::core::primitives::datetime_to_millis;
use crate::data::{TimeSeries, TimeSeriesPoint};
use crate::error::{ChartError, ChartResult};

/// Insertion index after every item whose key is `<= probe`.
#[must_use]
pub fn bisect_right_by<T, F>(items: &[T], probe: f64, key: F) -> usize
where
    F: Fn(&T) -> f64,
{
    items.partition_point(|item| key(item) <= probe)
}

/// Nearest item to `probe` over `items` sorted ascending by `key`.
pub fn nearest_by_key<T, F>(items: &[T], probe: f64, key: F) -> ChartResult<&T>
where
    F: Fn(&T) -> f64,
{
    if items.is_empty() {
        return Err(ChartError::EmptySeries);
    }
    if !probe.is_finite() {
        return Err(ChartError::invalid_value("probe", "probe must be finite"));
    }

    let index = bisect_right_by(items, probe, &key);
    let (Some(before), Some(after)) = (
        index.checked_sub(1).and_then(|i| items.get(i)),
        items.get(index),
    ) else {
        // Clamped: before the first sample or at/after the last one.
        return items
            .get(index.min(items.len() - 1))
            .ok_or(ChartError::EmptySeries);
    };

    if key(after) - probe < probe - key(before) {
        Ok(after)
    } else {
        Ok(before)
    }
}

/// Sample of `points` closest in time to `probe`.
pub fn nearest(probe: DateTime<Utc>, points: &[TimeSeriesPoint]) -> ChartResult<&TimeSeriesPoint> {
    nearest_by_key(points, datetime_to_millis(probe), |point| {
        datetime_to_millis(point.timestamp)
    })
}

/// Per-series result of a combined-chart lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesMatch<'a> {
    pub series: &'a TimeSeries,
    pub point: &'a TimeSeriesPoint,
}

/// Runs [`nearest`] independently for each series against one probe.
///
/// Slots line up with `series`; an empty series leaves `None` in its slot
/// without affecting the others.
#[must_use]
pub fn nearest_each<'a>(
    probe: DateTime<Utc>,
    series: &[&'a TimeSeries],
) -> SmallVec<[Option<SeriesMatch<'a>>; 4]> {
    series
        .iter()
        .map(|s| {
            s.nearest(probe)
                .ok()
                .map(|point| SeriesMatch { series: s, point })
        })
        .collect()
}
