use serde::{Deserialize, Serialize};

use crate::data::TimeSeries;
use crate::format;
use crate::render::Color;

/// How a layer's samples are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkKind {
    Line,
    Scatter,
}

/// Tooltip text format for a metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueFormat {
    /// `$1,234.56`
    Usd,
    /// `12.34`
    Fixed2,
    /// `1,234,567`
    Grouped,
}

impl ValueFormat {
    #[must_use]
    pub fn render(self, value: f64) -> String {
        match self {
            Self::Usd => format::usd(value),
            Self::Grouped => format::grouped(value),
            Self::Fixed2 if value.is_finite() => format!("{value:.2}"),
            Self::Fixed2 => "—".to_owned(),
        }
    }
}

/// Extra metric listed in the tooltip for a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: String,
    pub metric: String,
    pub format: ValueFormat,
}

/// One plotted metric of one series.
///
/// Without details the tooltip shows a single `label: value` row for the
/// plotted metric; with details it lists each detail field instead.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLayer {
    pub label: String,
    pub series: TimeSeries,
    pub metric: String,
    pub color: Color,
    pub kind: MarkKind,
    pub format: ValueFormat,
    pub details: Vec<DetailField>,
}

impl SeriesLayer {
    #[must_use]
    pub fn line(
        label: impl Into<String>,
        series: TimeSeries,
        metric: impl Into<String>,
        color: Color,
    ) -> Self {
        Self::new(label, series, metric, color, MarkKind::Line, ValueFormat::Usd)
    }

    #[must_use]
    pub fn scatter(
        label: impl Into<String>,
        series: TimeSeries,
        metric: impl Into<String>,
        color: Color,
    ) -> Self {
        Self::new(
            label,
            series,
            metric,
            color,
            MarkKind::Scatter,
            ValueFormat::Fixed2,
        )
    }

    fn new(
        label: impl Into<String>,
        series: TimeSeries,
        metric: impl Into<String>,
        color: Color,
        kind: MarkKind,
        format: ValueFormat,
    ) -> Self {
        Self {
            label: label.into(),
            series,
            metric: metric.into(),
            color,
            kind,
            format,
            details: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_detail(
        mut self,
        label: impl Into<String>,
        metric: impl Into<String>,
        format: ValueFormat,
    ) -> Self {
        self.details.push(DetailField {
            label: label.into(),
            metric: metric.into(),
            format,
        });
        self
    }

    /// Same series storage and metric as `other`, so derived scales still apply.
    #[must_use]
    pub fn same_source(&self, other: &Self) -> bool {
        self.series.same_dataset(&other.series) && self.metric == other.metric
    }
}

#[cfg(test)]
mod tests {
    use super::ValueFormat;

    #[test]
    fn value_formats_render_page_styles() {
        assert_eq!(ValueFormat::Usd.render(2_345.5), "$2,345.50");
        assert_eq!(ValueFormat::Fixed2.render(12.345_67), "12.35");
        assert_eq!(ValueFormat::Grouped.render(1_500_000.0), "1,500,000");
        assert_eq!(ValueFormat::Fixed2.render(f64::NAN), "—");
    }
}
