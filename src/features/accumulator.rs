//! Per-span-length feature accumulators.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use softgaz_core::TypeCode;

use super::{FeatureBlock, FeatureVector, MARGIN_PAIRS, TOP1_ROWS, TOP3_RANKS};

/// Row of the top-1 accumulator a window writes to.
///
/// Among the `n` windows containing a token, the last one (the window
/// starting at the token) is the anchor; every earlier window is context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Top1Row {
    /// Last window in rank order.
    Anchor,
    /// Any earlier window.
    Context,
}

impl Top1Row {
    /// Row for the window at `rank` out of `windows`.
    #[must_use]
    pub const fn for_rank(rank: usize, windows: usize) -> Self {
        if rank + 1 == windows {
            Self::Anchor
        } else {
            Self::Context
        }
    }

    /// Row index in the `2 × T` accumulator.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Anchor => 0,
            Self::Context => 1,
        }
    }
}

/// Accumulated evidence of all windows of one span length.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanAccumulator {
    top1: Array2<f64>,
    top3_counts: Array2<f64>,
    top3_scores: Array2<f64>,
    top30_counts: Array1<f64>,
    margins: Array1<f64>,
}

impl SpanAccumulator {
    /// Zeroed accumulator for `num_types` types.
    #[must_use]
    pub fn new(num_types: usize) -> Self {
        Self {
            top1: Array2::zeros((TOP1_ROWS, num_types)),
            top3_counts: Array2::zeros((TOP3_RANKS, num_types)),
            top3_scores: Array2::zeros((TOP3_RANKS, num_types)),
            top30_counts: Array1::zeros(num_types),
            margins: Array1::zeros(MARGIN_PAIRS),
        }
    }

    /// Add the best candidate's weight.
    pub fn add_top1(&mut self, row: Top1Row, code: TypeCode, weight: f64) {
        self.top1[[row.index(), code]] += weight;
    }

    /// Count a candidate at `rank < 3` and add its weight.
    pub fn add_top3(&mut self, rank: usize, code: TypeCode, weight: f64) {
        self.top3_counts[[rank, code]] += 1.0;
        self.top3_scores[[rank, code]] += weight;
    }

    /// Count a candidate among the first thirty.
    pub fn add_top30(&mut self, code: TypeCode) {
        self.top30_counts[code] += 1.0;
    }

    /// Add the weight gap between ranks `pair` and `pair + 1`.
    pub fn add_margin(&mut self, pair: usize, gap: f64) {
        self.margins[pair] += gap;
    }

    /// Divide by the number of requested windows (top-30 counts by
    /// `30 × windows`).
    pub fn normalize(&mut self, windows: usize) {
        if windows == 0 {
            return;
        }
        self.top1 /= FeatureBlock::Top1.divisor(windows);
        self.top3_counts /= FeatureBlock::Top3Counts.divisor(windows);
        self.top3_scores /= FeatureBlock::Top3Scores.divisor(windows);
        self.top30_counts /= FeatureBlock::Top30Counts.divisor(windows);
        self.margins /= FeatureBlock::Margins.divisor(windows);
    }

    /// Top-1 weights, `[row][type]`.
    #[must_use]
    pub fn top1(&self) -> ArrayView2<'_, f64> {
        self.top1.view()
    }

    /// Top-3 counts, `[rank][type]`.
    #[must_use]
    pub fn top3_counts(&self) -> ArrayView2<'_, f64> {
        self.top3_counts.view()
    }

    /// Top-3 weights, `[rank][type]`.
    #[must_use]
    pub fn top3_scores(&self) -> ArrayView2<'_, f64> {
        self.top3_scores.view()
    }

    /// Top-30 counts, `[type]`.
    #[must_use]
    pub fn top30_counts(&self) -> ArrayView1<'_, f64> {
        self.top30_counts.view()
    }

    /// Rank margins.
    #[must_use]
    pub fn margins(&self) -> ArrayView1<'_, f64> {
        self.margins.view()
    }

    /// Flatten (row-major) in block order.
    #[must_use]
    pub fn into_vector(self) -> FeatureVector {
        self.top1
            .iter()
            .chain(self.top3_counts.iter())
            .chain(self.top3_scores.iter())
            .chain(self.top30_counts.iter())
            .chain(self.margins.iter())
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureLayout;

    #[test]
    fn anchor_is_last_rank() {
        assert_eq!(Top1Row::for_rank(0, 1), Top1Row::Anchor);
        assert_eq!(Top1Row::for_rank(0, 3), Top1Row::Context);
        assert_eq!(Top1Row::for_rank(1, 3), Top1Row::Context);
        assert_eq!(Top1Row::for_rank(2, 3), Top1Row::Anchor);
    }

    #[test]
    fn vector_order_and_width() {
        let mut acc = SpanAccumulator::new(2);
        acc.add_top1(Top1Row::Context, 1, 0.5);
        acc.add_top3(2, 0, 0.25);
        acc.add_top30(1);
        acc.add_margin(2, 0.1);

        let v = acc.into_vector();
        assert_eq!(v.len(), FeatureLayout::new(2).span_width());
        // top1 row 1, type 1
        assert_eq!(v[3], 0.5);
        // top3_counts rank 2, type 0
        assert_eq!(v[4 + 4], 1.0);
        // top3_scores rank 2, type 0
        assert_eq!(v[10 + 4], 0.25);
        // top30 type 1
        assert_eq!(v[17], 1.0);
        assert_eq!(v[20], 0.1);
        assert!((v.sum() - 2.85).abs() < 1e-12);
    }

    #[test]
    fn normalize_divides_per_block() {
        let mut acc = SpanAccumulator::new(1);
        acc.add_top1(Top1Row::Anchor, 0, 3.0);
        acc.add_top3(0, 0, 1.5);
        acc.add_top30(0);
        acc.add_top30(0);
        acc.add_top30(0);
        acc.add_margin(0, 0.6);
        acc.normalize(3);

        assert_eq!(acc.top1()[[0, 0]], 1.0);
        assert!((acc.top3_counts()[[0, 0]] - 1.0 / 3.0).abs() < 1e-12);
        assert!((acc.top3_scores()[[0, 0]] - 0.5).abs() < 1e-12);
        assert!((acc.top30_counts()[0] - 3.0 / 90.0).abs() < 1e-12);
        assert!((acc.margins()[0] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn zero_stays_zero_after_normalize() {
        let mut acc = SpanAccumulator::new(3);
        acc.normalize(2);
        assert!(acc.into_vector().iter().all(|&x| x == 0.0));
    }
}
