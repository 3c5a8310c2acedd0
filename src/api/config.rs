use serde::{Deserialize, Serialize};

use crate::core::nice::DEFAULT_TICK_COUNT;
use crate::core::{Margins, PlotArea, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::format::DateStyle;
use crate::interaction::TooltipConfig;

/// Upper bound for `value_ticks`; tick marks and labels are built per tick.
pub const MAX_VALUE_TICKS: usize = 100;

/// Scatter dot sizes and opacity, normal and highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointStyle {
    pub radius: f64,
    pub opacity: f64,
    pub highlight_radius: f64,
    pub highlight_opacity: f64,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            radius: 3.0,
            opacity: 0.6,
            highlight_radius: 6.0,
            highlight_opacity: 1.0,
        }
    }
}

/// Layout and styling shared by every chart view.
///
/// Serializable so hosts can keep chart setup next to their data files.
/// Missing JSON fields fall back to the defaults of [`ChartConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,
    #[serde(default)]
    pub margins: Margins,
    #[serde(default = "default_value_ticks")]
    pub value_ticks: usize,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default)]
    pub points: PointStyle,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
    /// Gap between ranking bars as a fraction of the band step.
    #[serde(default = "default_band_padding")]
    pub band_padding: f64,
    #[serde(default)]
    pub tooltip: TooltipConfig,
    /// Format of the hovered date in the tooltip title.
    #[serde(default)]
    pub tooltip_date: DateStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::new(default_viewport())
    }
}

impl ChartConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margins: Margins::default(),
            value_ticks: default_value_ticks(),
            line_width: default_line_width(),
            points: PointStyle::default(),
            font_size_px: default_font_size_px(),
            band_padding: default_band_padding(),
            tooltip: TooltipConfig::default(),
            tooltip_date: DateStyle::default(),
        }
    }

    /// Layout of the horizontal volume ranking: a taller canvas with room
    /// for collection names and logos on the left.
    #[must_use]
    pub fn ranking() -> Self {
        Self::new(Viewport::new(1000, 800)).with_margins(Margins::new(20.0, 120.0, 60.0, 200.0))
    }

    /// Layout of the top-collections showcase strip.
    #[must_use]
    pub fn showcase() -> Self {
        Self::new(Viewport::new(600, 300)).with_margins(Margins::uniform(40.0))
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_value_ticks(mut self, value_ticks: usize) -> Self {
        self.value_ticks = value_ticks;
        self
    }

    #[must_use]
    pub fn with_tooltip(mut self, tooltip: TooltipConfig) -> Self {
        self.tooltip = tooltip;
        self
    }

    #[must_use]
    pub fn with_tooltip_date(mut self, style: DateStyle) -> Self {
        self.tooltip_date = style;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.plot_area()?;
        if self.value_ticks == 0 || self.value_ticks > MAX_VALUE_TICKS {
            return Err(ChartError::Config(format!(
                "value_ticks must be in [1, {MAX_VALUE_TICKS}], got {}",
                self.value_ticks
            )));
        }
        for (name, value) in [
            ("line_width", self.line_width),
            ("font_size_px", self.font_size_px),
            ("points.radius", self.points.radius),
            ("points.highlight_radius", self.points.highlight_radius),
            ("tooltip.width", self.tooltip.width),
            ("tooltip.height", self.tooltip.height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::Config(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("points.opacity", self.points.opacity),
            ("points.highlight_opacity", self.points.highlight_opacity),
            ("band_padding", self.band_padding),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::Config(format!("`{name}` must be in [0, 1]")));
            }
        }
        for (name, value) in [
            ("tooltip.gap", self.tooltip.gap),
            ("tooltip.lift", self.tooltip.lift),
            ("tooltip.min_top", self.tooltip.min_top),
        ] {
            if !value.is_finite() {
                return Err(ChartError::Config(format!("`{name}` must be finite")));
            }
        }
        Ok(())
    }

    pub fn plot_area(&self) -> ChartResult<PlotArea> {
        PlotArea::new(self.viewport, self.margins)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::Config(format!("failed to parse chart config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::Config(format!("failed to serialize chart config: {e}")))
    }
}

fn default_viewport() -> Viewport {
    Viewport::new(800, 400)
}

fn default_value_ticks() -> usize {
    DEFAULT_TICK_COUNT
}

fn default_line_width() -> f64 {
    2.0
}

fn default_font_size_px() -> f64 {
    12.0
}

fn default_band_padding() -> f64 {
    0.3
}

#[cfg(test)]
mod tests {
    use super::{ChartConfig, MAX_VALUE_TICKS};
    use crate::core::Viewport;
    use crate::format::DateStyle;

    #[test]
    fn empty_json_object_yields_defaults() {
        let config = ChartConfig::from_json_str("{}").expect("config");
        assert_eq!(config, ChartConfig::default());
        assert_eq!(config.viewport, Viewport::new(800, 400));
    }

    #[test]
    fn band_padding_outside_unit_interval_is_rejected() {
        assert!(ChartConfig::from_json_str(r#"{"band_padding": 0.0}"#).is_ok());
        assert!(ChartConfig::from_json_str(r#"{"band_padding": 1.5}"#).is_err());
    }

    #[test]
    fn value_tick_count_is_bounded() {
        assert!(ChartConfig::from_json_str(r#"{"value_ticks": 0}"#).is_err());
        assert!(ChartConfig::from_json_str(r#"{"value_ticks": 1000000000000}"#).is_err());
        assert!(
            ChartConfig::default()
                .with_value_ticks(MAX_VALUE_TICKS)
                .validate()
                .is_ok()
        );
        assert!(
            ChartConfig::default()
                .with_value_ticks(MAX_VALUE_TICKS + 1)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn tooltip_date_style_reads_from_json() {
        let config = ChartConfig::from_json_str(r#"{"tooltip_date": "iso"}"#).expect("config");
        assert_eq!(config.tooltip_date, DateStyle::Iso);
        assert_eq!(ChartConfig::default().tooltip_date, DateStyle::Long);
    }
}
