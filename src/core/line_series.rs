use serde::{Deserialize, Serialize};

use crate::core::{PlotArea, TimeScale, ValueScale};
use crate::data::TimeSeriesPoint;
use crate::error::ChartResult;

/// Projected line segment in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    /// Clips the segment to `plot` (Liang-Barsky); `None` when it lies outside.
    #[must_use]
    pub fn clip_to(self, plot: PlotArea) -> Option<Self> {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for (p, q) in [
            (-dx, self.x1 - plot.left),
            (dx, plot.right - self.x1),
            (-dy, self.y1 - plot.top),
            (dy, plot.bottom - self.y1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }
        Some(Self {
            x1: self.x1 + t0 * dx,
            y1: self.y1 + t0 * dy,
            x2: self.x1 + t1 * dx,
            y2: self.y1 + t1 * dy,
        })
    }
}

/// Projects one metric of a series into adjacent line segments.
///
/// A sample without a finite value breaks the line: no segment is drawn
/// into or out of it, so gaps stay visible instead of being bridged.
pub fn project_line_segments(
    points: &[TimeSeriesPoint],
    metric: &str,
    time_scale: TimeScale,
    value_scale: ValueScale,
) -> ChartResult<Vec<LineSegment>> {
    if points.len() < 2 {
        return Ok(Vec::new());
    }

    let mut mapped: Vec<Option<(f64, f64)>> = Vec::with_capacity(points.len());
    for point in points {
        mapped.push(match point.metric(metric) {
            Some(value) => Some((
                time_scale.scale(point.timestamp),
                value_scale.scale(value)?,
            )),
            None => None,
        });
    }

    let mut segments = Vec::with_capacity(mapped.len() - 1);
    for pair in mapped.windows(2) {
        if let (Some((x1, y1)), Some((x2, y2))) = (pair[0], pair[1]) {
            segments.push(LineSegment { x1, y1, x2, y2 });
        }
    }

    Ok(segments)
}
