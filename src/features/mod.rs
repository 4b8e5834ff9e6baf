//! Soft gazetteer feature families and the layout of a feature vector.
//!
//! # Per-span-length block
//!
//! For each span length `n` in `1..=3` a token gets one block of
//! `9T + 3` columns (`T` = number of entity types):
//!
//! | Block          | Shape  | Meaning                                        |
//! |----------------|--------|------------------------------------------------|
//! | `top1`         | 2 × T  | weight of the best candidate, anchor / context |
//! | `top3_counts`  | 3 × T  | type counts at candidate ranks 0, 1, 2         |
//! | `top3_scores`  | 3 × T  | weights at candidate ranks 0, 1, 2             |
//! | `top30_counts` | T      | type counts over the first 30 candidates       |
//! | `margins`      | 3      | weight gaps between ranks (0,1), (1,2), (2,3)  |
//!
//! The three blocks are concatenated in order `n = 1, 2, 3`. Disabled
//! families still occupy their columns (as zeros), so the width depends
//! only on `T`.
//!
//! # References
//!
//! - Rijhwani et al. (2020). "Soft Gazetteers for Low-Resource Named Entity
//!   Recognition"

mod accumulator;
mod aggregator;

pub use accumulator::{SpanAccumulator, Top1Row};
pub use aggregator::FeatureAggregator;

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::span::{MAX_SPAN_LEN, SPAN_LENGTHS};
use crate::{Error, Result};

/// Feature vector of one token.
pub type FeatureVector = Array1<f64>;

/// One feature vector per token, rows in sentence order.
pub type SentenceFeatureMatrix = Array2<f64>;

/// Rows of the top-1 accumulator (anchor, context).
pub const TOP1_ROWS: usize = 2;

/// Candidate ranks tracked by the top-3 features.
pub const TOP3_RANKS: usize = 3;

/// Candidates counted by the top-30 feature; also its normalizer.
pub const TOP30_LIMIT: usize = 30;

/// Consecutive-rank gaps tracked by the margin feature.
pub const MARGIN_PAIRS: usize = 3;

/// Candidates a window needs before top-3 and top-30 apply.
pub const MIN_RANKED_CANDIDATES: usize = TOP3_RANKS;

/// Candidates a window needs before margins apply.
pub const MIN_MARGIN_CANDIDATES: usize = MARGIN_PAIRS + 1;

// =============================================================================
// Feature families
// =============================================================================

/// A group of features that can be switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureFamily {
    /// Weight of the best candidate, split by window position.
    Top1,
    /// Type counts and weights of the three best candidates.
    Top3,
    /// Type counts over the thirty best candidates.
    Top30,
    /// Weight gaps between consecutive candidates.
    Margin,
}

impl FeatureFamily {
    /// Every family, in canonical order.
    pub const ALL: [FeatureFamily; 4] = [Self::Top1, Self::Top3, Self::Top30, Self::Margin];

    /// Name used in configuration and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top1 => "top1",
            Self::Top3 => "top3",
            Self::Top30 => "top30",
            Self::Margin => "margin",
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for FeatureFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::config(format!(
                    "unknown feature type '{s}' (expected top1, top3, top30, margin or all)"
                ))
            })
    }
}

/// Set of enabled feature families.
///
/// ```rust
/// use softgaz::features::{FeatureFamily, FeatureSet};
///
/// let set = FeatureSet::from_names(["top1", "margin"]).unwrap();
/// assert!(set.contains(FeatureFamily::Top1));
/// assert!(!set.contains(FeatureFamily::Top30));
/// assert_eq!(FeatureSet::from_names(["all"]).unwrap(), FeatureSet::all());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FeatureSet(u8);

impl FeatureSet {
    /// Keyword selecting every family.
    pub const ALL_KEYWORD: &'static str = "all";

    /// No family enabled.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every family enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self(0b1111)
    }

    /// Add a family.
    #[must_use]
    pub const fn with(self, family: FeatureFamily) -> Self {
        Self(self.0 | family.bit())
    }

    /// Add a family in place.
    pub fn insert(&mut self, family: FeatureFamily) {
        self.0 |= family.bit();
    }

    /// Whether a family is enabled.
    #[must_use]
    pub const fn contains(self, family: FeatureFamily) -> bool {
        self.0 & family.bit() != 0
    }

    /// Whether nothing is enabled.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Enabled families in canonical order.
    pub fn iter(self) -> impl Iterator<Item = FeatureFamily> {
        FeatureFamily::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    /// Parse family names; `all` enables everything.
    pub fn from_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        for name in names {
            let name = name.as_ref();
            if name.trim().eq_ignore_ascii_case(Self::ALL_KEYWORD) {
                set = Self::all();
            } else {
                set.insert(name.parse()?);
            }
        }
        Ok(set)
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<FeatureFamily> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = FeatureFamily>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(FeatureFamily::name).collect();
        f.write_str(&names.join(","))
    }
}

impl TryFrom<Vec<String>> for FeatureSet {
    type Error = Error;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::from_names(names)
    }
}

impl From<FeatureSet> for Vec<String> {
    fn from(set: FeatureSet) -> Self {
        set.iter().map(|f| f.name().to_string()).collect()
    }
}

/// Switches that shape the numeric output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureOptions {
    /// Enabled feature families.
    pub features: FeatureSet,
    /// Divide accumulators by the number of windows after aggregation.
    pub normalize: bool,
}

impl FeatureOptions {
    /// Options with the given families, unnormalized.
    #[must_use]
    pub const fn new(features: FeatureSet) -> Self {
        Self {
            features,
            normalize: false,
        }
    }

    /// Set normalization.
    #[must_use]
    pub const fn normalized(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

// =============================================================================
// Layout
// =============================================================================

/// A contiguous block of columns inside one span-length block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureBlock {
    /// `2 × T` top-1 weights.
    Top1,
    /// `3 × T` top-3 type counts.
    Top3Counts,
    /// `3 × T` top-3 weights.
    Top3Scores,
    /// `T` top-30 type counts.
    Top30Counts,
    /// `3` rank margins.
    Margins,
}

impl FeatureBlock {
    /// Blocks in concatenation order.
    pub const ALL: [FeatureBlock; 5] = [
        Self::Top1,
        Self::Top3Counts,
        Self::Top3Scores,
        Self::Top30Counts,
        Self::Margins,
    ];

    /// Column count for `num_types` types.
    #[must_use]
    pub const fn width(self, num_types: usize) -> usize {
        match self {
            Self::Top1 => TOP1_ROWS * num_types,
            Self::Top3Counts | Self::Top3Scores => TOP3_RANKS * num_types,
            Self::Top30Counts => num_types,
            Self::Margins => MARGIN_PAIRS,
        }
    }

    /// Normalization divisor when `windows` windows were requested.
    #[must_use]
    pub fn divisor(self, windows: usize) -> f64 {
        match self {
            Self::Top30Counts => (TOP30_LIMIT * windows) as f64,
            _ => windows as f64,
        }
    }

    /// Family that fills this block.
    #[must_use]
    pub const fn family(self) -> FeatureFamily {
        match self {
            Self::Top1 => FeatureFamily::Top1,
            Self::Top3Counts | Self::Top3Scores => FeatureFamily::Top3,
            Self::Top30Counts => FeatureFamily::Top30,
            Self::Margins => FeatureFamily::Margin,
        }
    }

    /// Short column-group name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top1 => "top1",
            Self::Top3Counts => "top3_counts",
            Self::Top3Scores => "top3_scores",
            Self::Top30Counts => "top30_counts",
            Self::Margins => "margins",
        }
    }
}

/// Column layout of a token feature vector for a fixed number of types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureLayout {
    num_types: usize,
}

impl FeatureLayout {
    /// Layout for `num_types` entity types.
    #[must_use]
    pub const fn new(num_types: usize) -> Self {
        Self { num_types }
    }

    /// Number of entity types.
    #[must_use]
    pub const fn num_types(&self) -> usize {
        self.num_types
    }

    /// Columns per span length: `9T + 3`.
    #[must_use]
    pub const fn span_width(&self) -> usize {
        let t = self.num_types;
        FeatureBlock::Top1.width(t)
            + FeatureBlock::Top3Counts.width(t)
            + FeatureBlock::Top3Scores.width(t)
            + FeatureBlock::Top30Counts.width(t)
            + FeatureBlock::Margins.width(t)
    }

    /// Full token vector width.
    #[must_use]
    pub const fn width(&self) -> usize {
        MAX_SPAN_LEN * self.span_width()
    }

    /// Columns of `block` for span length `n`, or `None` if `n` is not
    /// a feature span length.
    #[must_use]
    pub fn range(&self, n: usize, block: FeatureBlock) -> Option<Range<usize>> {
        let span_idx = SPAN_LENGTHS.iter().position(|&len| len == n)?;
        let mut start = span_idx * self.span_width();
        for b in FeatureBlock::ALL {
            let width = b.width(self.num_types);
            if b == block {
                return Some(start..start + width);
            }
            start += width;
        }
        None
    }

    /// Every `(n, block, columns)` triple in vector order.
    pub fn columns(&self) -> impl Iterator<Item = (usize, FeatureBlock, Range<usize>)> + '_ {
        SPAN_LENGTHS.into_iter().flat_map(move |n| {
            FeatureBlock::ALL.into_iter().filter_map(move |block| {
                self.range(n, block).map(|range| (n, block, range))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_names_round_trip() {
        for family in FeatureFamily::ALL {
            assert_eq!(family.name().parse::<FeatureFamily>().unwrap(), family);
        }
        assert_eq!("TOP30".parse::<FeatureFamily>().unwrap(), FeatureFamily::Top30);
        assert!("top5".parse::<FeatureFamily>().is_err());
    }

    #[test]
    fn feature_set_membership() {
        let set = FeatureSet::empty().with(FeatureFamily::Top3);
        assert!(set.contains(FeatureFamily::Top3));
        assert!(!set.contains(FeatureFamily::Top1));
        assert!(FeatureSet::empty().is_empty());
        assert_eq!(FeatureSet::all().iter().count(), 4);
        assert_eq!(FeatureSet::default(), FeatureSet::all());
    }

    #[test]
    fn feature_set_from_names() {
        let set = FeatureSet::from_names(["margin", "top1"]).unwrap();
        assert_eq!(set.to_string(), "top1,margin");
        assert_eq!(FeatureSet::from_names(["top1", "all"]).unwrap(), FeatureSet::all());
        assert!(FeatureSet::from_names(["top1", "nope"]).is_err());
    }

    #[test]
    fn feature_set_serde() {
        let set = FeatureSet::from_names(["top3", "top30"]).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["top3","top30"]"#);
        let back: FeatureSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert!(serde_json::from_str::<FeatureSet>(r#"["bogus"]"#).is_err());
    }

    #[test]
    fn layout_width() {
        let layout = FeatureLayout::new(3);
        assert_eq!(layout.span_width(), 9 * 3 + 3);
        assert_eq!(layout.width(), 3 * 30);
        assert_eq!(FeatureLayout::new(1).width(), 36);
    }

    #[test]
    fn layout_ranges_tile_the_vector() {
        let layout = FeatureLayout::new(4);
        let mut next = 0;
        for (_, _, range) in layout.columns() {
            assert_eq!(range.start, next);
            next = range.end;
        }
        assert_eq!(next, layout.width());
        assert_eq!(layout.columns().count(), 15);
    }

    #[test]
    fn layout_range_lookup() {
        let layout = FeatureLayout::new(2);
        assert_eq!(layout.range(1, FeatureBlock::Top1), Some(0..4));
        assert_eq!(layout.range(1, FeatureBlock::Margins), Some(18..21));
        assert_eq!(layout.range(2, FeatureBlock::Top1), Some(21..25));
        assert_eq!(layout.range(4, FeatureBlock::Top1), None);
    }

    #[test]
    fn top30_divisor_is_constant() {
        assert_eq!(FeatureBlock::Top30Counts.divisor(2), 60.0);
        assert_eq!(FeatureBlock::Margins.divisor(2), 2.0);
    }
}
