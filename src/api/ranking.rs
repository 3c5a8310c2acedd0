use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{BandScale, LinearScale, PlotArea};
use crate::data::{NftCollection, rank_by_volume};
use crate::error::{ChartError, ChartResult};
use crate::format;
use crate::interaction::{TooltipContent, TooltipPlacement, place_tooltip};
use crate::render::{Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::ChartConfig;
use super::scene::push_usd_bottom_axis;

const VOLUME_TICKS: usize = 5;
const BAR_OPACITY: f64 = 0.9;
const LOGO_GUTTER: f64 = 40.0;
const NAME_GAP: f64 = 10.0;
/// Logo edge as a fraction of the band height.
const LOGO_SCALE: f64 = 0.8;

/// Where one collection logo goes; logos are raster images, so hosts draw them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoSlot {
    pub name: String,
    pub url: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingHover {
    pub index: usize,
    pub tooltip: TooltipContent,
    pub placement: TooltipPlacement,
}

/// Horizontal bar chart of collections ranked by trading volume.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingChart {
    config: ChartConfig,
    plot: PlotArea,
    entries: Vec<NftCollection>,
    volumes: Vec<f64>,
    bands: BandScale,
    volume_scale: LinearScale,
}

impl RankingChart {
    /// Ranks `collections` and keeps the top `limit`, one band each.
    ///
    /// Bars share a volume axis `[0, max volume]`; the maximum must be positive.
    /// Collections without a volume get an empty bar.
    pub fn new(collections: &[NftCollection], limit: usize, config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        let plot = config.plot_area()?;
        let entries: Vec<NftCollection> = rank_by_volume(collections, limit)
            .into_iter()
            .cloned()
            .collect();
        if entries.is_empty() {
            return Err(ChartError::DegenerateDomain(
                "ranking needs at least one collection".to_owned(),
            ));
        }
        let volumes = entries
            .iter()
            .map(|entry| entry.volume_f64().map(|volume| volume.unwrap_or(0.0)))
            .collect::<ChartResult<Vec<f64>>>()?;
        let max = volumes.first().copied().unwrap_or_default();
        if max <= 0.0 {
            return Err(ChartError::DegenerateDomain(format!(
                "ranking needs a positive top volume, got {max}"
            )));
        }

        // Names stay unique per band even when two collections share one.
        let band_keys = entries
            .iter()
            .enumerate()
            .map(|(rank, entry)| format!("{rank}:{}", entry.name));
        let bands = BandScale::new(band_keys, (plot.top, plot.bottom), config.band_padding)?;
        let volume_scale = LinearScale::new((0.0, max), plot.x_range())?;

        debug!(entries = entries.len(), max_volume = max, "built volume ranking");
        Ok(Self {
            config,
            plot,
            entries,
            volumes,
            bands,
            volume_scale,
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[NftCollection] {
        &self.entries
    }

    #[must_use]
    pub fn plot_area(&self) -> PlotArea {
        self.plot
    }

    /// Bar rectangle for the entry at `index`.
    #[must_use]
    pub fn bar(&self, index: usize) -> Option<RectPrimitive> {
        let y = self.bands.band_at(index)?;
        let width = self.volume_scale.project(*self.volumes.get(index)?) - self.plot.left;
        Some(RectPrimitive::new(
            self.plot.left,
            y,
            width.max(0.0),
            self.bands.bandwidth(),
            Color::INDIGO.with_alpha(BAR_OPACITY),
        ))
    }

    /// Entry whose bar contains the pointer.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        let index = self.bands.index_at(y)?;
        self.bar(index)?.contains(x, y).then_some(index)
    }

    #[must_use]
    pub fn tooltip_content(&self, index: usize) -> Option<TooltipContent> {
        let entry = self.entries.get(index)?;
        Some(
            TooltipContent::new(entry.name.clone())
                .with_row("Volume", optional_usd(entry.volume_usd))
                .with_row("Market Cap", optional_usd(entry.market_cap_usd))
                .with_row(
                    "Sales",
                    entry
                        .sales
                        .map_or_else(|| "—".to_owned(), |sales| format::grouped(sales as f64)),
                )
                .with_row("Floor Price", optional_usd(entry.floor_price_usd)),
        )
    }

    pub fn pointer_move(&self, x: f64, y: f64) -> Option<RankingHover> {
        let index = self.hit_test(x, y)?;
        Some(RankingHover {
            index,
            tooltip: self.tooltip_content(index)?,
            placement: place_tooltip(
                x,
                y,
                f64::from(self.config.viewport.width),
                self.config.tooltip,
            ),
        })
    }

    /// Logo squares left of each bar, centered in the band at 80% of its height.
    #[must_use]
    pub fn logo_slots(&self) -> Vec<LogoSlot> {
        let bandwidth = self.bands.bandwidth();
        let size = bandwidth * LOGO_SCALE;
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.logo.is_empty())
            .filter_map(|(index, entry)| {
                Some(LogoSlot {
                    name: entry.name.clone(),
                    url: entry.logo.clone(),
                    x: self.plot.left - LOGO_GUTTER,
                    y: self.bands.band_at(index)? + (bandwidth - size) / 2.0,
                    size,
                })
            })
            .collect()
    }

    pub fn frame(&self) -> ChartResult<RenderFrame> {
        let mut frame = RenderFrame::new(self.config.viewport);
        push_usd_bottom_axis(
            &mut frame,
            &self.config,
            self.plot,
            self.volume_scale,
            VOLUME_TICKS,
        );

        let font = self.config.font_size_px;
        for (index, entry) in self.entries.iter().enumerate() {
            let Some(bar) = self.bar(index) else { continue };
            frame.rects.push(bar);
            if !entry.name.is_empty() {
                frame.texts.push(TextPrimitive::new(
                    entry.name.clone(),
                    self.plot.left - LOGO_GUTTER - NAME_GAP,
                    bar.y + bar.height / 2.0 + font / 3.0,
                    font,
                    Color::AXIS,
                    TextHAlign::Right,
                ));
            }
        }
        Ok(frame)
    }
}

/// Highlighted collection in the showcase strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowcaseSlot {
    pub name: String,
    pub logo: String,
    pub volume_label: String,
    pub cx: f64,
    pub cy: f64,
    pub logo_size: f64,
}

/// Horizontal centers for `count` logos of `logo_size`, spaced two logos apart
/// and centered in `width`.
#[must_use]
pub fn showcase_positions(count: usize, width: f64, logo_size: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let spacing = logo_size * 2.0;
    let start = (width - (count - 1) as f64 * spacing) / 2.0;
    (0..count).map(|i| start + i as f64 * spacing).collect()
}

/// Lays out the first `count` collections in file order across the plot area.
pub fn showcase_layout(
    collections: &[NftCollection],
    count: usize,
    logo_size: f64,
    config: &ChartConfig,
) -> ChartResult<Vec<ShowcaseSlot>> {
    let plot = config.plot_area()?;
    let shown = &collections[..count.min(collections.len())];
    let cy = plot.top + plot.height() / 2.0;
    Ok(shown
        .iter()
        .zip(showcase_positions(shown.len(), plot.width(), logo_size))
        .map(|(entry, offset)| ShowcaseSlot {
            name: entry.name.clone(),
            logo: entry.logo.clone(),
            volume_label: optional_usd(entry.volume_usd),
            cx: plot.left + offset,
            cy,
            logo_size,
        })
        .collect())
}

fn optional_usd(value: Option<Decimal>) -> String {
    value.map_or_else(|| "—".to_owned(), format::usd_decimal)
}

#[cfg(test)]
mod tests {
    use super::showcase_positions;

    #[test]
    fn showcase_positions_are_centered() {
        assert_eq!(showcase_positions(3, 520.0, 80.0), vec![100.0, 260.0, 420.0]);
        assert_eq!(showcase_positions(1, 520.0, 80.0), vec![260.0]);
        assert!(showcase_positions(0, 520.0, 80.0).is_empty());
    }
}
