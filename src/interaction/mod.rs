pub mod nearest;
pub mod tooltip;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use nearest::{SeriesMatch, nearest, nearest_by_key, nearest_each};
pub use tooltip::{
    TooltipConfig, TooltipContent, TooltipGuard, TooltipHost, TooltipPlacement, TooltipRow,
    place_tooltip,
};

/// A resolved sample of one layer under the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverMatch {
    /// Position of the layer in the view's layer list.
    pub layer_index: usize,
    pub layer: String,
    pub timestamp: DateTime<Utc>,
    /// `None` when the sample has no finite value for the layer's metric.
    pub value: Option<f64>,
    pub x: f64,
    pub y: Option<f64>,
}

/// Hover feedback for one pointer position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    pub pointer_x: f64,
    pub pointer_y: f64,
    pub probe: DateTime<Utc>,
    pub matches: Vec<HoverMatch>,
    pub tooltip: TooltipContent,
    pub placement: TooltipPlacement,
}

impl HoverState {
    /// Content and placement in the shape [`TooltipGuard::present`] takes.
    #[must_use]
    pub fn tooltip(&self) -> (&TooltipContent, TooltipPlacement) {
        (&self.tooltip, self.placement)
    }
}
