//! Frame assembly for time-series views: axes, marks, legend.

use tracing::trace;

use crate::core::{
    LinearScale, PlotArea, TimeScale, ValueScale, nice, project_line_segments, project_scatter,
};
use crate::error::ChartResult;
use crate::format;
use crate::interaction::HoverState;
use crate::render::{CirclePrimitive, Color, LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::{ChartConfig, MarkKind, SeriesLayer};

const TICK_SIZE: f64 = 6.0;
const TICK_LABEL_PAD: f64 = 3.0;
const AXIS_STROKE: f64 = 1.0;
const LEGEND_ROW_HEIGHT: f64 = 20.0;
const LEGEND_SWATCH_RADIUS: f64 = 6.0;
const LEGEND_INSET: f64 = 100.0;
/// Slack for marks sitting exactly on the plot edge.
const CLIP_TOLERANCE: f64 = 1e-6;

/// Scales derived from the committed layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedScales {
    pub time: TimeScale,
    pub value: ValueScale,
}

impl DerivedScales {
    /// Union time extent and a shared zero-based value axis over every layer.
    pub fn derive(
        layers: &[SeriesLayer],
        plot: PlotArea,
        value_ticks: usize,
    ) -> ChartResult<Self> {
        let series: Vec<_> = layers.iter().map(|layer| &layer.series).collect();
        let time = TimeScale::from_series(&series, plot.x_range())?;
        let value = ValueScale::from_values_with_ticks(
            layers
                .iter()
                .flat_map(|layer| layer.series.metric_values(&layer.metric)),
            plot.y_range(),
            value_ticks,
        )?;
        Ok(Self { time, value })
    }
}

pub(crate) fn time_series_frame(
    config: &ChartConfig,
    plot: PlotArea,
    layers: &[SeriesLayer],
    scales: Option<DerivedScales>,
    hover: Option<&HoverState>,
) -> ChartResult<RenderFrame> {
    let mut frame = RenderFrame::new(config.viewport);
    let Some(scales) = scales else {
        return Ok(frame);
    };

    let clip = plot.inflate(CLIP_TOLERANCE);
    push_time_axis(&mut frame, config, plot, scales.time);
    push_value_axis(&mut frame, config, plot, scales.value);

    for (index, layer) in layers.iter().enumerate() {
        match layer.kind {
            MarkKind::Line => {
                let segments = project_line_segments(
                    layer.series.points(),
                    &layer.metric,
                    scales.time,
                    scales.value,
                )?;
                frame.lines.extend(
                    segments
                        .into_iter()
                        .filter_map(|segment| segment.clip_to(clip))
                        .map(|s| {
                            LinePrimitive::new(s.x1, s.y1, s.x2, s.y2, config.line_width, layer.color)
                        }),
                );
            }
            MarkKind::Scatter => {
                let highlighted = hover.and_then(|state| {
                    state
                        .matches
                        .iter()
                        .find(|m| m.layer_index == index)
                        .map(|m| m.timestamp)
                });
                let marks =
                    project_scatter(layer.series.points(), &layer.metric, scales.time, scales.value)?;
                let style = config.points;
                let visible = marks
                    .into_iter()
                    .filter(|mark| clip.contains(mark.cx, mark.cy));
                frame.circles.extend(visible.map(|mark| {
                    if highlighted == Some(mark.timestamp) {
                        CirclePrimitive::new(
                            mark.cx,
                            mark.cy,
                            style.highlight_radius,
                            layer.color.with_alpha(style.highlight_opacity),
                        )
                    } else {
                        CirclePrimitive::new(
                            mark.cx,
                            mark.cy,
                            style.radius,
                            layer.color.with_alpha(style.opacity),
                        )
                    }
                }));
            }
        }
    }

    if layers.len() > 1 {
        push_legend(&mut frame, config, plot, layers);
    }

    trace!(
        lines = frame.lines.len(),
        circles = frame.circles.len(),
        texts = frame.texts.len(),
        "built time series frame"
    );
    Ok(frame)
}

/// Year boundaries along the bottom edge; windows without one get their two
/// end dates instead.
fn push_time_axis(frame: &mut RenderFrame, config: &ChartConfig, plot: PlotArea, time: TimeScale) {
    frame.lines.push(LinePrimitive::new(
        plot.left,
        plot.bottom,
        plot.right,
        plot.bottom,
        AXIS_STROKE,
        Color::AXIS,
    ));

    let year_ticks = time.year_ticks();
    let ticks: Vec<(String, f64)> = if year_ticks.is_empty() {
        let (start, end) = time.domain();
        vec![
            (format::iso_date(start), plot.left),
            (format::iso_date(end), plot.right),
        ]
    } else {
        year_ticks
            .into_iter()
            .map(|(at, x)| (format::year(at), x))
            .collect()
    };

    for (label, x) in ticks {
        push_bottom_tick(frame, config, plot, x, label);
    }
}

fn push_value_axis(frame: &mut RenderFrame, config: &ChartConfig, plot: PlotArea, value: ValueScale) {
    frame.lines.push(LinePrimitive::new(
        plot.left,
        plot.top,
        plot.left,
        plot.bottom,
        AXIS_STROKE,
        Color::AXIS,
    ));

    for (tick, y) in value.ticks(config.value_ticks) {
        frame.lines.push(LinePrimitive::new(
            plot.left - TICK_SIZE,
            y,
            plot.left,
            y,
            AXIS_STROKE,
            Color::AXIS,
        ));
        frame.texts.push(TextPrimitive::new(
            format::grouped(tick),
            plot.left - TICK_SIZE - TICK_LABEL_PAD,
            y + config.font_size_px / 3.0,
            config.font_size_px,
            Color::AXIS,
            TextHAlign::Right,
        ));
    }
}

/// Horizontal value axis formatted as compact dollars, used by the ranking view.
pub(crate) fn push_usd_bottom_axis(
    frame: &mut RenderFrame,
    config: &ChartConfig,
    plot: PlotArea,
    scale: LinearScale,
    tick_count: usize,
) {
    frame.lines.push(LinePrimitive::new(
        plot.left,
        plot.bottom,
        plot.right,
        plot.bottom,
        AXIS_STROKE,
        Color::AXIS,
    ));
    let (lo, hi) = scale.domain();
    for tick in nice::ticks(lo, hi, tick_count) {
        let x = scale.project(tick);
        push_bottom_tick(frame, config, plot, x, format::usd_compact(tick));
    }
}

fn push_bottom_tick(
    frame: &mut RenderFrame,
    config: &ChartConfig,
    plot: PlotArea,
    x: f64,
    label: String,
) {
    frame.lines.push(LinePrimitive::new(
        x,
        plot.bottom,
        x,
        plot.bottom + TICK_SIZE,
        AXIS_STROKE,
        Color::AXIS,
    ));
    frame.texts.push(TextPrimitive::new(
        label,
        x,
        plot.bottom + TICK_SIZE + TICK_LABEL_PAD + config.font_size_px,
        config.font_size_px,
        Color::AXIS,
        TextHAlign::Center,
    ));
}

fn push_legend(frame: &mut RenderFrame, config: &ChartConfig, plot: PlotArea, layers: &[SeriesLayer]) {
    let x = plot.right - LEGEND_INSET;
    let mut y = plot.top + LEGEND_ROW_HEIGHT / 2.0;
    for layer in layers {
        if !layer.label.is_empty() {
            frame.circles.push(CirclePrimitive::new(
                x,
                y,
                LEGEND_SWATCH_RADIUS,
                layer.color,
            ));
            frame.texts.push(TextPrimitive::new(
                layer.label.clone(),
                x + LEGEND_ROW_HEIGHT,
                y + config.font_size_px / 3.0,
                config.font_size_px,
                Color::AXIS,
                TextHAlign::Left,
            ));
        }
        y += LEGEND_ROW_HEIGHT;
    }
}
