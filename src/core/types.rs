use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Space reserved around the plot area for axes and labels, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 30.0,
            bottom: 40.0,
            left: 50.0,
        }
    }
}

impl Margins {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Inner rectangle of a viewport where marks are plotted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    pub fn new(viewport: Viewport, margins: Margins) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        for (side, value) in [
            ("top", margins.top),
            ("right", margins.right),
            ("bottom", margins.bottom),
            ("left", margins.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::Config(format!(
                    "margin `{side}` must be finite and >= 0"
                )));
            }
        }

        let area = Self {
            left: margins.left,
            top: margins.top,
            right: f64::from(viewport.width) - margins.right,
            bottom: f64::from(viewport.height) - margins.bottom,
        };
        if area.width() <= 0.0 || area.height() <= 0.0 {
            return Err(ChartError::Config(format!(
                "margins leave no plot area in a {}x{} viewport",
                viewport.width, viewport.height
            )));
        }
        Ok(area)
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    /// Horizontal pixel range, left to right.
    #[must_use]
    pub fn x_range(self) -> (f64, f64) {
        (self.left, self.right)
    }

    /// Vertical pixel range with larger values drawn higher (bottom to top).
    #[must_use]
    pub fn y_range(self) -> (f64, f64) {
        (self.bottom, self.top)
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Grows every side by `amount` pixels.
    #[must_use]
    pub fn inflate(self, amount: f64) -> Self {
        Self {
            left: self.left - amount,
            top: self.top - amount,
            right: self.right + amount,
            bottom: self.bottom + amount,
        }
    }
}
