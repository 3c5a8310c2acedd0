use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::data::LoadedTable;
use crate::error::{ChartError, ChartResult};
use crate::interaction::nearest;

/// One timestamped sample with named metrics.
///
/// Metrics keep column order. A metric that was blank or unparseable is
/// stored as `NaN` so the row still exists for hover lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub metrics: IndexMap<String, f64>,
}

impl TimeSeriesPoint {
    #[must_use]
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            metrics: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Finite value of `name`; `None` when absent or `NaN`.
    #[must_use]
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics
            .get(name)
            .copied()
            .filter(|value| value.is_finite())
    }
}

/// Named, timestamp-ordered, immutable sequence of samples.
///
/// Cloning shares the underlying storage. Two series "are the same dataset"
/// only when they share storage; rebuilding from the same rows is a new
/// dataset as far as derived scales are concerned.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    points: Arc<[TimeSeriesPoint]>,
}

impl TimeSeries {
    /// Sorts `points` ascending by timestamp; on duplicates the later row wins.
    #[must_use]
    pub fn from_points(name: impl Into<String>, points: Vec<TimeSeriesPoint>) -> Self {
        let name = name.into();
        let points = canonicalize_points(&name, points);
        Self {
            name,
            points: points.into(),
        }
    }

    /// Coerces table rows into samples keyed by `time_field`.
    ///
    /// Every row must carry a parseable `time_field`; metric cells that fail
    /// to parse become `NaN`. Metric columns absent from the header are an
    /// error, not a silent all-`NaN` metric.
    pub fn from_table(
        name: impl Into<String>,
        table: &LoadedTable,
        time_field: &str,
        metric_fields: &[&str],
    ) -> ChartResult<Self> {
        for field in std::iter::once(&time_field).chain(metric_fields) {
            if !table.has_column(field) {
                return Err(ChartError::invalid_value(
                    *field,
                    "column not present in dataset header",
                ));
            }
        }

        let mut points = Vec::with_capacity(table.len());
        for record in table.records() {
            let mut point = TimeSeriesPoint::new(record.timestamp(time_field)?);
            for field in metric_fields {
                point
                    .metrics
                    .insert((*field).to_owned(), record.number_or_nan(field));
            }
            points.push(point);
        }
        Ok(Self::from_points(name, points))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&TimeSeriesPoint> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    /// `true` when both handles share the same storage.
    #[must_use]
    pub fn same_dataset(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }

    /// Sample closest in time to `probe`; see [`nearest::nearest`].
    pub fn nearest(&self, probe: DateTime<Utc>) -> ChartResult<&TimeSeriesPoint> {
        nearest::nearest(probe, &self.points)
    }

    /// Finite values of `metric` in timestamp order, skipping gaps.
    pub fn metric_values<'a>(&'a self, metric: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.points.iter().filter_map(move |point| point.metric(metric))
    }
}

fn canonicalize_points(name: &str, mut points: Vec<TimeSeriesPoint>) -> Vec<TimeSeriesPoint> {
    let original_len = points.len();
    // Stable, so the last of several equal timestamps is still last here.
    points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let mut deduped: Vec<TimeSeriesPoint> = Vec::with_capacity(points.len());
    for point in points {
        if let Some(last) = deduped.last_mut() {
            if point.timestamp.cmp(&last.timestamp) == Ordering::Equal {
                *last = point;
                continue;
            }
        }
        deduped.push(point);
    }

    let duplicate_count = original_len - deduped.len();
    if duplicate_count > 0 {
        warn!(
            series = name,
            duplicate_count,
            canonical_count = deduped.len(),
            "collapsed duplicate timestamps"
        );
    } else {
        debug!(series = name, count = deduped.len(), "built time series");
    }
    deduped
}
