use serde::{Deserialize, Serialize};

/// Tooltip box geometry and pointer offsets, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipConfig {
    pub width: f64,
    pub height: f64,
    /// Horizontal gap between pointer and box.
    pub gap: f64,
    /// How far above the pointer the box is raised.
    pub lift: f64,
    /// Smallest allowed distance from the top edge before the box drops below the pointer.
    pub min_top: f64,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 120.0,
            gap: 10.0,
            lift: 100.0,
            min_top: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub x: f64,
    pub y: f64,
    pub flipped_left: bool,
    pub dropped_below: bool,
}

/// Positions the box right of and above the pointer, flipping to the left
/// when it would overflow `surface_width` and dropping below the pointer
/// when it would cross the top edge.
#[must_use]
pub fn place_tooltip(
    pointer_x: f64,
    pointer_y: f64,
    surface_width: f64,
    config: TooltipConfig,
) -> TooltipPlacement {
    let right_x = pointer_x + config.gap;
    let flipped_left = right_x + config.width > surface_width;
    let x = if flipped_left {
        pointer_x - config.width - config.gap
    } else {
        right_x
    };

    let raised_y = pointer_y - config.lift;
    let dropped_below = raised_y < config.min_top;
    let y = if dropped_below {
        pointer_y + config.gap
    } else {
        raised_y
    };

    TooltipPlacement {
        x,
        y,
        flipped_left,
        dropped_below,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
}

/// Text shown in a tooltip: a title line followed by label/value rows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TooltipContent {
    pub title: String,
    pub rows: Vec<TooltipRow>,
}

impl TooltipContent {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push(TooltipRow {
            label: label.into(),
            value: value.into(),
        });
        self
    }
}

/// Surface that can host tooltip elements, implemented by the presentation layer.
pub trait TooltipHost {
    type Handle;

    fn create(&mut self) -> Self::Handle;
    fn show(
        &mut self,
        handle: &Self::Handle,
        content: &TooltipContent,
        placement: TooltipPlacement,
    );
    fn hide(&mut self, handle: &Self::Handle);
    fn remove(&mut self, handle: Self::Handle);
}

/// A tooltip element owned by one view; removed from the host on drop.
pub struct TooltipGuard<'h, H: TooltipHost> {
    host: &'h mut H,
    handle: Option<H::Handle>,
}

impl<'h, H: TooltipHost> TooltipGuard<'h, H> {
    pub fn acquire(host: &'h mut H) -> Self {
        let handle = host.create();
        Self {
            host,
            handle: Some(handle),
        }
    }

    pub fn show(&mut self, content: &TooltipContent, placement: TooltipPlacement) {
        if let Some(handle) = &self.handle {
            self.host.show(handle, content, placement);
        }
    }

    pub fn hide(&mut self) {
        if let Some(handle) = &self.handle {
            self.host.hide(handle);
        }
    }

    /// Shows `tooltip` when present, hides the element otherwise.
    pub fn present(&mut self, tooltip: Option<(&TooltipContent, TooltipPlacement)>) {
        match tooltip {
            Some((content, placement)) => self.show(content, placement),
            None => self.hide(),
        }
    }
}

impl<H: TooltipHost> Drop for TooltipGuard<'_, H> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.host.remove(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TooltipConfig, place_tooltip};

    #[test]
    fn tooltip_sits_right_and_above_by_default() {
        let placement = place_tooltip(100.0, 200.0, 800.0, TooltipConfig::default());
        assert_eq!((placement.x, placement.y), (110.0, 100.0));
        assert!(!placement.flipped_left && !placement.dropped_below);
    }

    #[test]
    fn tooltip_flips_and_drops_near_edges() {
        let placement = place_tooltip(700.0, 50.0, 800.0, TooltipConfig::default());
        assert_eq!((placement.x, placement.y), (490.0, 60.0));
        assert!(placement.flipped_left && placement.dropped_below);
    }
}
