use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::{TimeScale, ValueScale};
use crate::data::TimeSeriesPoint;
use crate::error::ChartResult;

/// Projected scatter sample; keeps its timestamp so hover can highlight it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScatterMark {
    pub cx: f64,
    pub cy: f64,
    pub timestamp: DateTime<Utc>,
}

/// Projects every finite sample of `metric`; missing values produce no mark.
pub fn project_scatter(
    points: &[TimeSeriesPoint],
    metric: &str,
    time_scale: TimeScale,
    value_scale: ValueScale,
) -> ChartResult<Vec<ScatterMark>> {
    #[cfg(feature = "parallel-projection")]
    {
        let projected: Vec<ChartResult<ScatterMark>> = points
            .par_iter()
            .filter_map(|point| {
                point
                    .metric(metric)
                    .map(|value| project_single(point, value, time_scale, value_scale))
            })
            .collect();
        projected.into_iter().collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        let mut out = Vec::with_capacity(points.len());
        for point in points {
            if let Some(value) = point.metric(metric) {
                out.push(project_single(point, value, time_scale, value_scale)?);
            }
        }
        Ok(out)
    }
}

fn project_single(
    point: &TimeSeriesPoint,
    value: f64,
    time_scale: TimeScale,
    value_scale: ValueScale,
) -> ChartResult<ScatterMark> {
    Ok(ScatterMark {
        cx: time_scale.scale(point.timestamp),
        cy: value_scale.scale(value)?,
        timestamp: point.timestamp,
    })
}
