use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::PlotArea;
use crate::data::TimeSeries;
use crate::error::ChartResult;
use crate::interaction::{HoverMatch, HoverState, TooltipContent, nearest_each, place_tooltip};
use crate::render::{RenderFrame, Renderer};

use super::scene::{self, DerivedScales};
use super::zoom::{ZOOM_EXTENT, ZoomWindow, validate_zoom_inputs};
use super::{ChartConfig, LoadSequencer, LoadTicket, SeriesLayer};

#[derive(Debug, Clone)]
struct CommittedData {
    layers: Vec<SeriesLayer>,
    scales: DerivedScales,
    zoom: ZoomWindow,
    visible: DerivedScales,
}

impl CommittedData {
    fn new(layers: Vec<SeriesLayer>, scales: DerivedScales) -> Self {
        Self {
            layers,
            scales,
            zoom: ZoomWindow::full(scales),
            visible: scales,
        }
    }
}

/// One time-series chart: committed layers, derived scales and hover state.
///
/// Scales are derived once per dataset commit and reused for every frame
/// and hover query until the next commit. Zooming derives rescaled copies
/// from them; frames and hover always use the rescaled ones. A view with no
/// committed data renders an empty frame and reports no hover.
pub struct TimeSeriesView<R: Renderer> {
    renderer: R,
    config: ChartConfig,
    plot: PlotArea,
    loads: LoadSequencer,
    data: Option<CommittedData>,
    hover: Option<HoverState>,
}

impl<R: Renderer> TimeSeriesView<R> {
    pub fn new(renderer: R, config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        let plot = config.plot_area()?;
        Ok(Self {
            renderer,
            config,
            plot,
            loads: LoadSequencer::new(),
            data: None,
            hover: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.plot
    }

    /// Starts a dataset load; only the latest ticket can be committed.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads.begin()
    }

    /// Commits the result of the load identified by `ticket`.
    ///
    /// Returns `Ok(false)` when a newer load has been started since, leaving
    /// the view untouched. A changed dataset resets the zoom. When scale
    /// derivation fails the view is cleared and the error is returned.
    pub fn commit(&mut self, ticket: LoadTicket, layers: Vec<SeriesLayer>) -> ChartResult<bool> {
        if !self.loads.accept(ticket) {
            return Ok(false);
        }
        self.hover = None;

        if let Some(current) = &mut self.data {
            let unchanged = current.layers.len() == layers.len()
                && current
                    .layers
                    .iter()
                    .zip(&layers)
                    .all(|(old, new)| old.same_source(new));
            if unchanged {
                trace!(ticket = ticket.id(), "dataset unchanged, keeping derived scales");
                current.layers = layers;
                return Ok(true);
            }
        }

        match DerivedScales::derive(&layers, self.plot, self.config.value_ticks) {
            Ok(scales) => {
                debug!(
                    ticket = ticket.id(),
                    layers = layers.len(),
                    points = layers.iter().map(|l| l.series.len()).sum::<usize>(),
                    "committed dataset"
                );
                self.data = Some(CommittedData::new(layers, scales));
                Ok(true)
            }
            Err(err) => {
                warn!(ticket = ticket.id(), error = %err, "cannot derive scales, clearing view");
                self.data = None;
                Err(err)
            }
        }
    }

    /// [`begin_load`](Self::begin_load) and [`commit`](Self::commit) in one step.
    pub fn set_layers(&mut self, layers: Vec<SeriesLayer>) -> ChartResult<()> {
        let ticket = self.begin_load();
        self.commit(ticket, layers).map(|_| ())
    }

    pub fn clear(&mut self) {
        self.data = None;
        self.hover = None;
    }

    #[must_use]
    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    #[must_use]
    pub fn layers(&self) -> &[SeriesLayer] {
        self.data.as_ref().map_or(&[][..], |data| data.layers.as_slice())
    }

    /// Scales currently drawn, zoom applied.
    #[must_use]
    pub fn scales(&self) -> Option<DerivedScales> {
        self.data.as_ref().map(|data| data.visible)
    }

    /// Scales derived at commit, unaffected by zoom.
    #[must_use]
    pub fn base_scales(&self) -> Option<DerivedScales> {
        self.data.as_ref().map(|data| data.scales)
    }

    /// Current magnification; `1.0` when not zoomed or without data.
    #[must_use]
    pub fn zoom_level(&self) -> f64 {
        self.data
            .as_ref()
            .map_or(ZOOM_EXTENT.0, |data| data.zoom.level())
    }

    /// Zooms by `factor` around the pixel column `anchor_x`, keeping the
    /// value axis pinned at its baseline. See [`zoom_at`](Self::zoom_at).
    pub fn zoom(&mut self, factor: f64, anchor_x: f64) -> ChartResult<f64> {
        self.zoom_at(factor, anchor_x, self.plot.bottom)
    }

    /// Zooms both axes by `factor` around the pixel `(anchor_x, anchor_y)`.
    ///
    /// The accumulated level is clamped to [`ZOOM_EXTENT`]. The point under
    /// the anchor stays put unless the window would leave the committed
    /// extent. Returns the new level. Without data this does nothing.
    pub fn zoom_at(&mut self, factor: f64, anchor_x: f64, anchor_y: f64) -> ChartResult<f64> {
        validate_zoom_inputs(factor, anchor_x, anchor_y)?;
        let Some(data) = &mut self.data else {
            trace!("zoom ignored without committed data");
            return Ok(ZOOM_EXTENT.0);
        };

        let anchor_x = anchor_x.clamp(self.plot.left, self.plot.right);
        let anchor_y = anchor_y.clamp(self.plot.top, self.plot.bottom);
        let anchor_ms = data.visible.time.millis_at(anchor_x)?;
        let anchor_value = data.visible.value.invert(anchor_y)?;
        let window = data.zoom.scaled(data.scales, factor, anchor_ms, anchor_value);
        let visible = window.apply(data.scales)?;
        data.zoom = window;
        data.visible = visible;
        self.hover = None;
        debug!(factor, anchor_x, anchor_y, level = window.level(), "zoomed view");
        Ok(window.level())
    }

    /// Restores the committed scales; returns `true` when the view was zoomed.
    pub fn reset_zoom(&mut self) -> bool {
        let Some(data) = &mut self.data else {
            return false;
        };
        if data.zoom.is_full() {
            return false;
        }
        data.zoom = ZoomWindow::full(data.scales);
        data.visible = data.scales;
        self.hover = None;
        true
    }

    /// Resolves hover feedback for a pointer at `(x, y)` in surface pixels.
    ///
    /// Each layer is matched independently against the probe time; the
    /// tooltip lists every matched layer. Pointers outside the plot area and
    /// views without data produce no feedback.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<&HoverState> {
        self.hover = self
            .data
            .as_ref()
            .and_then(|data| resolve_hover(&self.config, self.plot, data, x, y));
        self.hover.as_ref()
    }

    pub fn pointer_leave(&mut self) {
        self.hover = None;
    }

    #[must_use]
    pub fn hover(&self) -> Option<&HoverState> {
        self.hover.as_ref()
    }

    pub fn build_frame(&self) -> ChartResult<RenderFrame> {
        let (layers, scales) = match &self.data {
            Some(data) => (data.layers.as_slice(), Some(data.visible)),
            None => (&[][..], None),
        };
        scene::time_series_frame(
            &self.config,
            self.plot,
            layers,
            scales,
            self.hover.as_ref(),
        )
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_frame()?;
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

fn resolve_hover(
    config: &ChartConfig,
    plot: PlotArea,
    data: &CommittedData,
    x: f64,
    y: f64,
) -> Option<HoverState> {
    if !plot.contains(x, y) {
        return None;
    }
    let scales = data.visible;
    let probe = scales.time.invert(x).ok()?;

    let series: SmallVec<[&TimeSeries; 4]> = data.layers.iter().map(|l| &l.series).collect();
    let found = nearest_each(probe, &series);

    let mut matches = Vec::with_capacity(found.len());
    let mut tooltip: Option<TooltipContent> = None;
    for (index, (layer, hit)) in data.layers.iter().zip(found).enumerate() {
        let Some(hit) = hit else { continue };
        let value = hit.point.metric(&layer.metric);
        matches.push(HoverMatch {
            layer_index: index,
            layer: layer.label.clone(),
            timestamp: hit.point.timestamp,
            value,
            x: scales.time.scale(hit.point.timestamp),
            y: value.and_then(|v| scales.value.scale(v).ok()),
        });

        let mut content = tooltip.take().unwrap_or_else(|| {
            TooltipContent::new(config.tooltip_date.render(hit.point.timestamp))
        });
        if layer.details.is_empty() {
            content = content.with_row(
                layer.label.clone(),
                layer.format.render(value.unwrap_or(f64::NAN)),
            );
        } else {
            for detail in &layer.details {
                let detail_value = hit.point.metric(&detail.metric).unwrap_or(f64::NAN);
                content = content.with_row(detail.label.clone(), detail.format.render(detail_value));
            }
        }
        tooltip = Some(content);
    }

    let tooltip = tooltip?;
    let placement = place_tooltip(x, y, f64::from(config.viewport.width), config.tooltip);
    trace!(probe = %probe, matches = matches.len(), "resolved hover");
    Some(HoverState {
        pointer_x: x,
        pointer_y: y,
        probe,
        matches,
        tooltip,
        placement,
    })
}
