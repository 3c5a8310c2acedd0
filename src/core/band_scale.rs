use indexmap::IndexSet;

use crate::error::{ChartError, ChartResult};

/// Ordinal scale placing one equal-width band per label along a range.
///
/// `padding` is applied both between bands and at both ends, and the bands
/// are centered in the range. Repeated labels share the first band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    labels: IndexSet<String>,
    range: (f64, f64),
    start: f64,
    step: f64,
    bandwidth: f64,
    reversed: bool,
}

impl BandScale {
    pub fn new<I, S>(labels: I, range: (f64, f64), padding: f64) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: IndexSet<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(ChartError::DegenerateDomain(
                "band scale needs at least one label".to_owned(),
            ));
        }
        if !padding.is_finite() || !(0.0..=1.0).contains(&padding) {
            return Err(ChartError::InvalidData(
                "band padding must be finite and in [0, 1]".to_owned(),
            ));
        }
        let (r0, r1) = range;
        if !r0.is_finite() || !r1.is_finite() || r0 == r1 {
            return Err(ChartError::InvalidData(format!(
                "band range [{r0}, {r1}] must be finite with non-zero width"
            )));
        }

        let reversed = r1 < r0;
        let (lo, hi) = if reversed { (r1, r0) } else { (r0, r1) };
        let n = labels.len() as f64;
        let padding_inner = padding;
        let padding_outer = padding;
        let step = (hi - lo) / (n - padding_inner + padding_outer * 2.0).max(1.0);
        let start = lo + (hi - lo - step * (n - padding_inner)) * 0.5;
        let bandwidth = step * (1.0 - padding_inner);

        Ok(Self {
            labels,
            range,
            start,
            step,
            bandwidth,
            reversed,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Leading edge of the band at `index`.
    #[must_use]
    pub fn band_at(&self, index: usize) -> Option<f64> {
        if index >= self.labels.len() {
            return None;
        }
        let slot = if self.reversed {
            self.labels.len() - 1 - index
        } else {
            index
        };
        Some(self.start + self.step * slot as f64)
    }

    /// Leading edge of the band for `label`.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<f64> {
        self.band_at(self.labels.get_index_of(label)?)
    }

    /// Label whose band contains `pixel`; gaps between bands hit nothing.
    #[must_use]
    pub fn label_at(&self, pixel: f64) -> Option<&str> {
        self.labels.get_index(self.index_at(pixel)?).map(String::as_str)
    }

    /// Label index whose band contains `pixel`.
    #[must_use]
    pub fn index_at(&self, pixel: f64) -> Option<usize> {
        if !pixel.is_finite() || self.step <= 0.0 {
            return None;
        }
        let offset = (pixel - self.start) / self.step;
        if offset < 0.0 {
            return None;
        }
        let slot = offset.floor() as usize;
        if slot >= self.labels.len() {
            return None;
        }
        let band_start = self.start + self.step * slot as f64;
        if pixel > band_start + self.bandwidth {
            return None;
        }
        Some(if self.reversed {
            self.labels.len() - 1 - slot
        } else {
            slot
        })
    }
}

#[cfg(test)]
mod tests {
    use super::BandScale;

    #[test]
    fn bands_are_centered_with_outer_padding() {
        let scale = BandScale::new(["a", "b", "c", "d"], (0.0, 100.0), 0.0).expect("band");
        assert_eq!(scale.step(), 25.0);
        assert_eq!(scale.band_at(0), Some(0.0));
        assert_eq!(scale.band_at(3), Some(75.0));
    }

    #[test]
    fn reversed_range_places_first_label_last() {
        let scale = BandScale::new(["a", "b"], (100.0, 0.0), 0.0).expect("band");
        assert_eq!(scale.position("a"), Some(50.0));
        assert_eq!(scale.position("b"), Some(0.0));
        assert_eq!(scale.label_at(60.0), Some("a"));
    }

    #[test]
    fn duplicate_labels_collapse() {
        let scale = BandScale::new(["a", "a", "b"], (0.0, 10.0), 0.0).expect("band");
        assert_eq!(scale.len(), 2);
    }
}
