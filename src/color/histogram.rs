//! Hue histograms over [0, 360)
//!
//! Bins are contiguous and non-overlapping; every bin is half-open except
//! the last one, which also holds its upper edge. Counts always sum to the
//! number of finite hues fed in.

use crate::constants::canonical::HUE_CIRCLE_DEGREES;
use crate::error::{AnalysisError, Result};

/// One histogram bin `[low, high)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueBin {
    pub low: f32,
    pub high: f32,
    pub count: usize,
}

/// Ordered hue histogram
#[derive(Debug, Clone, PartialEq)]
pub struct HueHistogram {
    bins: Vec<HueBin>,
}

impl HueHistogram {
    /// Histogram with fixed-width bins starting at 0°
    ///
    /// When the width does not divide 360 the last bin extends past 360.
    pub fn uniform<'a>(hues: impl IntoIterator<Item = &'a f32>, bin_width: f32) -> Result<Self> {
        if !(bin_width > 0.0 && bin_width <= HUE_CIRCLE_DEGREES) {
            return Err(AnalysisError::invalid_parameter("hue_bin_width", bin_width));
        }
        let bin_count = (HUE_CIRCLE_DEGREES / bin_width).ceil() as usize;
        let edges: Vec<f32> = (0..=bin_count).map(|k| k as f32 * bin_width).collect();
        Self::with_edges(hues, &edges)
    }

    /// Histogram over explicit, strictly increasing edges
    pub fn with_edges<'a>(hues: impl IntoIterator<Item = &'a f32>, edges: &[f32]) -> Result<Self> {
        if edges.len() < 2 || edges.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(AnalysisError::invalid_parameter(
                "histogram_edges",
                format!("{:?}", edges),
            ));
        }

        let mut bins: Vec<HueBin> = edges
            .windows(2)
            .map(|w| HueBin {
                low: w[0],
                high: w[1],
                count: 0,
            })
            .collect();

        for &hue in hues {
            if let Some(index) = bin_index(edges, hue) {
                bins[index].count += 1;
            }
        }

        Ok(Self { bins })
    }

    pub fn bins(&self) -> &[HueBin] {
        &self.bins
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Index of the most populous bin
    ///
    /// Ties go to the lowest bin index (first occurrence in ascending order).
    pub fn mode_index(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (index, bin) in self.bins.iter().enumerate() {
            match best {
                Some((_, count)) if bin.count <= count => {}
                _ => best = Some((index, bin.count)),
            }
        }
        best.map(|(index, _)| index)
    }

    /// Index of the bin holding `hue`, if any
    pub fn index_of(&self, hue: f32) -> Option<usize> {
        let low = self.bins.first()?.low;
        let high = self.bins.last()?.high;
        if !(hue >= low && hue <= high) {
            return None;
        }
        let position = self.bins.partition_point(|b| b.high <= hue);
        Some(position.min(self.bins.len() - 1))
    }

    /// Counts normalised to fractions of the total (all zero when empty)
    pub fn fractions(&self) -> Vec<f64> {
        let total = self.total().max(1) as f64;
        self.bins.iter().map(|b| b.count as f64 / total).collect()
    }
}

fn bin_index(edges: &[f32], hue: f32) -> Option<usize> {
    let last = edges.len() - 1;
    if !(hue >= edges[0] && hue <= edges[last]) {
        return None;
    }
    let position = edges.partition_point(|&edge| edge <= hue);
    // hue == last edge belongs to the closed final bin
    Some(position.saturating_sub(1).min(last - 1))
}
