use crate::error::{ChartError, ChartResult};

use super::DerivedScales;

/// Allowed magnification, from the full dataset extent up to 5x.
pub const ZOOM_EXTENT: (f64, f64) = (1.0, 5.0);

/// One axis of a zoom window, in domain units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisWindow {
    start: f64,
    end: f64,
}

impl AxisWindow {
    /// Window of `full_span / level` keeping `anchor` at its relative
    /// position, shifted back inside `full` when it would overshoot.
    fn rescaled(self, full: Self, level: f64, anchor: f64) -> Self {
        let current_span = self.end - self.start;
        let target_span = (full.end - full.start) / level;
        let ratio = ((anchor - self.start) / current_span).clamp(0.0, 1.0);
        // `level > 1`, so `target_span` is narrower than `full`.
        let start = (anchor - ratio * target_span).clamp(full.start, full.end - target_span);
        Self {
            start,
            end: start + target_span,
        }
    }
}

/// Visible window of a zoomed view, relative to its committed scales.
///
/// Both axes shrink by the same level; the window never leaves the
/// committed extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ZoomWindow {
    level: f64,
    time: AxisWindow,
    value: AxisWindow,
}

impl ZoomWindow {
    pub(crate) fn full(base: DerivedScales) -> Self {
        let (time_start, time_end) = base.time.millis_domain();
        let (value_start, value_end) = base.value.domain();
        Self {
            level: ZOOM_EXTENT.0,
            time: AxisWindow {
                start: time_start,
                end: time_end,
            },
            value: AxisWindow {
                start: value_start,
                end: value_end,
            },
        }
    }

    pub(crate) fn level(self) -> f64 {
        self.level
    }

    pub(crate) fn is_full(self) -> bool {
        self.level <= ZOOM_EXTENT.0
    }

    /// Scales the window by `factor` around `(anchor_ms, anchor_value)`.
    ///
    /// `factor > 1.0` zooms in, `0.0 < factor < 1.0` zooms out. The resulting
    /// level is clamped to [`ZOOM_EXTENT`].
    pub(crate) fn scaled(
        self,
        base: DerivedScales,
        factor: f64,
        anchor_ms: f64,
        anchor_value: f64,
    ) -> Self {
        let full = Self::full(base);
        let level = (self.level * factor).clamp(ZOOM_EXTENT.0, ZOOM_EXTENT.1);
        if level <= ZOOM_EXTENT.0 {
            return full;
        }
        Self {
            level,
            time: self.time.rescaled(full.time, level, anchor_ms),
            value: self.value.rescaled(full.value, level, anchor_value),
        }
    }

    /// Rescaled copies of `base` showing this window.
    pub(crate) fn apply(self, base: DerivedScales) -> ChartResult<DerivedScales> {
        if self.is_full() {
            return Ok(base);
        }
        Ok(DerivedScales {
            time: base.time.with_millis_domain(self.time.start, self.time.end)?,
            value: base.value.with_window(self.value.start, self.value.end)?,
        })
    }
}

pub(crate) fn validate_zoom_inputs(factor: f64, anchor_x: f64, anchor_y: f64) -> ChartResult<()> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ChartError::InvalidData(
            "zoom factor must be finite and > 0".to_owned(),
        ));
    }
    if !anchor_x.is_finite() || !anchor_y.is_finite() {
        return Err(ChartError::InvalidData(
            "zoom anchor px must be finite".to_owned(),
        ));
    }
    Ok(())
}
