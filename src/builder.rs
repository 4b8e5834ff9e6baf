//! Sentence and corpus feature construction.
//!
//! ```rust
//! use softgaz::diagnostics::NullSink;
//! use softgaz::{
//!     CandidateList, FeatureOptions, FeatureSet, Gazetteer, NgramCandidateTable,
//!     SentenceFeatureBuilder, TypeLookup, TypeRegistry,
//! };
//!
//! let registry = TypeRegistry::register(["LOC", "PER"]).unwrap();
//! let types: TypeLookup = [("Q90", 0)].into_iter().collect();
//! let table: NgramCandidateTable = [("Paris", CandidateList::parse("Q90 | 0.9"))]
//!     .into_iter()
//!     .collect();
//! let gazetteer = Gazetteer::new(registry, types, table);
//!
//! let builder = SentenceFeatureBuilder::new(&gazetteer, FeatureOptions::new(FeatureSet::all()));
//! let corpus = builder.build_corpus(&[vec!["Paris", "is", "big"]], &NullSink);
//!
//! assert_eq!(corpus.sentences()[0].dim(), (3, builder.layout().width()));
//! assert!(!corpus.summary().all_zero());
//! ```

use std::fmt;

use ndarray::{s, Array2};
use serde::Serialize;

use crate::diagnostics::{MatchLog, MatchSink};
use crate::features::{
    FeatureAggregator, FeatureLayout, FeatureOptions, FeatureVector, SentenceFeatureMatrix,
};
use crate::gazetteer::Gazetteer;
use crate::span::SPAN_LENGTHS;
use crate::transliterate::Transliterator;

/// Builds token feature vectors and sentence matrices.
#[derive(Debug, Clone, Copy)]
pub struct SentenceFeatureBuilder<'a> {
    aggregator: FeatureAggregator<'a>,
    layout: FeatureLayout,
}

impl<'a> SentenceFeatureBuilder<'a> {
    /// Builder over `gazetteer`.
    #[must_use]
    pub fn new(gazetteer: &'a Gazetteer, options: FeatureOptions) -> Self {
        Self {
            aggregator: FeatureAggregator::new(gazetteer, options),
            layout: gazetteer.layout(),
        }
    }

    /// Convert contexts with `transliterator` before lookup.
    #[must_use]
    pub fn with_transliterator(mut self, transliterator: &'a dyn Transliterator) -> Self {
        self.aggregator = self.aggregator.with_transliterator(transliterator);
        self
    }

    /// Column layout of the produced vectors.
    #[must_use]
    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    /// Feature vector of `tokens[token]`: span lengths 1, 2, 3 concatenated.
    pub fn token_features<S: AsRef<str>>(
        &self,
        tokens: &[S],
        token: usize,
        matches: &MatchLog<'_>,
    ) -> FeatureVector {
        let span_width = self.layout.span_width();
        let mut vector = FeatureVector::zeros(self.layout.width());
        for (idx, n) in SPAN_LENGTHS.into_iter().enumerate() {
            let block = self
                .aggregator
                .aggregate(tokens, token, n, matches)
                .into_vector();
            vector
                .slice_mut(s![idx * span_width..(idx + 1) * span_width])
                .assign(&block);
        }
        vector
    }

    /// One row per token, in sentence order.
    pub fn sentence_features<S: AsRef<str>>(
        &self,
        tokens: &[S],
        matches: &MatchLog<'_>,
    ) -> SentenceFeatureMatrix {
        let mut matrix = Array2::zeros((tokens.len(), self.layout.width()));
        for (i, mut row) in matrix.rows_mut().into_iter().enumerate() {
            row.assign(&self.token_features(tokens, i, matches));
        }
        matrix
    }

    /// Features of every sentence, in input order.
    ///
    /// A fresh [`MatchLog`] scopes first-match reporting to this call.
    /// With the `parallel` feature, sentences are spread over rayon's pool.
    pub fn build_corpus<S>(&self, sentences: &[Vec<S>], sink: &dyn MatchSink) -> CorpusFeatures
    where
        S: AsRef<str> + Sync,
    {
        let matches = MatchLog::new(sink);

        #[cfg(feature = "parallel")]
        let matrices: Vec<SentenceFeatureMatrix> = {
            use rayon::prelude::*;
            sentences
                .par_iter()
                .map(|tokens| self.sentence_features(tokens, &matches))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let matrices: Vec<SentenceFeatureMatrix> = sentences
            .iter()
            .map(|tokens| self.sentence_features(tokens, &matches))
            .collect();

        log::debug!(
            "Built features for {} sentences ({} distinct n-gram matches)",
            matrices.len(),
            matches.distinct_matches()
        );

        CorpusFeatures {
            sentences: matrices,
            width: self.layout.width(),
            distinct_matches: matches.distinct_matches(),
        }
    }
}

/// Feature matrices of a corpus, one per sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusFeatures {
    sentences: Vec<SentenceFeatureMatrix>,
    width: usize,
    distinct_matches: usize,
}

impl CorpusFeatures {
    /// Matrices in sentence order.
    #[must_use]
    pub fn sentences(&self) -> &[SentenceFeatureMatrix] {
        &self.sentences
    }

    /// Take the matrices.
    #[must_use]
    pub fn into_sentences(self) -> Vec<SentenceFeatureMatrix> {
        self.sentences
    }

    /// Columns per token.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Distinct n-grams that matched during the run.
    #[must_use]
    pub fn distinct_matches(&self) -> usize {
        self.distinct_matches
    }

    /// Number of sentences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Whether the corpus had no sentences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Corpus-level statistics, including the all-zero check.
    #[must_use]
    pub fn summary(&self) -> CorpusSummary {
        let sentence_sums: Vec<f64> = self.sentences.iter().map(|m| m.sum()).collect();
        CorpusSummary {
            sentences: self.sentences.len(),
            tokens: self.sentences.iter().map(|m| m.nrows()).sum(),
            width: self.width,
            zero_sentences: sentence_sums.iter().filter(|&&s| s == 0.0).count(),
            distinct_matches: self.distinct_matches,
            sentence_sums,
        }
    }
}

/// Statistics over a corpus run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusSummary {
    /// Number of sentences.
    pub sentences: usize,
    /// Number of tokens.
    pub tokens: usize,
    /// Columns per token.
    pub width: usize,
    /// Sentences whose features sum to zero.
    pub zero_sentences: usize,
    /// Distinct n-grams that matched.
    pub distinct_matches: usize,
    /// Sum of each sentence's matrix.
    pub sentence_sums: Vec<f64>,
}

/// Distinct sums shown in the summary before the rest are elided.
const SUM_HISTOGRAM_SHOWN: usize = 8;

impl CorpusSummary {
    /// Whether every sentence's features sum to zero. Usually means the
    /// candidate table and the input do not overlap.
    #[must_use]
    pub fn all_zero(&self) -> bool {
        self.zero_sentences == self.sentences
    }

    /// Distinct sentence sums with how many sentences have each, most
    /// frequent first; ties go to the smaller sum.
    #[must_use]
    pub fn sum_histogram(&self) -> Vec<(f64, usize)> {
        let mut sums = self.sentence_sums.clone();
        sums.sort_by(f64::total_cmp);

        let mut histogram: Vec<(f64, usize)> = Vec::new();
        for sum in sums {
            match histogram.last_mut() {
                Some((value, count)) if value.total_cmp(&sum).is_eq() => *count += 1,
                _ => histogram.push((sum, 1)),
            }
        }
        histogram.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.total_cmp(&b.0)));
        histogram
    }
}

impl fmt::Display for CorpusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sentences:        {}", self.sentences)?;
        writeln!(f, "Tokens:           {}", self.tokens)?;
        writeln!(f, "Feature width:    {}", self.width)?;
        writeln!(f, "Distinct matches: {}", self.distinct_matches)?;
        writeln!(
            f,
            "Zero sentences:   {} / {}",
            self.zero_sentences, self.sentences
        )?;
        let histogram = self.sum_histogram();
        let shown: Vec<String> = histogram
            .iter()
            .take(SUM_HISTOGRAM_SHOWN)
            .map(|(sum, count)| format!("{sum}x{count}"))
            .collect();
        write!(f, "Sentence sums:    {}", shown.join(" "))?;
        if histogram.len() > SUM_HISTOGRAM_SHOWN {
            write!(f, " (+{} more)", histogram.len() - SUM_HISTOGRAM_SHOWN)?;
        }
        writeln!(f)?;
        write!(f, "All features 0?   {}", self.all_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::NgramCandidateTable;
    use crate::diagnostics::{CollectingSink, NullSink};
    use crate::features::{FeatureBlock, FeatureSet};
    use crate::kb::TypeLookup;
    use ndarray::ArrayView1;
    use softgaz_core::{CandidateList, TypeRegistry};

    fn gazetteer() -> Gazetteer {
        let registry = TypeRegistry::register(["LOC", "PER", "ORG"]).unwrap();
        let types: TypeLookup = [("Q60", 0), ("Q1", 1), ("Q2", 2)].into_iter().collect();
        let table: NgramCandidateTable = [
            ("New York", CandidateList::parse("Q60 | 0.9 || Q2 | 0.4 || Q1 | 0.1")),
            ("York", CandidateList::parse("Q1 | 0.3")),
        ]
        .into_iter()
        .collect();
        Gazetteer::new(registry, types, table)
    }

    fn sentences() -> Vec<Vec<&'static str>> {
        vec![
            vec!["I", "love", "New", "York"],
            vec!["nothing", "here"],
            vec!["York"],
        ]
    }

    #[test]
    fn every_row_has_the_layout_width() {
        let gaz = gazetteer();
        let builder = SentenceFeatureBuilder::new(&gaz, FeatureOptions::default());
        let corpus = builder.build_corpus(&sentences(), &NullSink);

        assert_eq!(corpus.len(), 3);
        for (matrix, tokens) in corpus.sentences().iter().zip(sentences()) {
            assert_eq!(matrix.dim(), (tokens.len(), 90));
        }
    }

    #[test]
    fn bigram_evidence_lands_on_both_tokens() {
        let gaz = gazetteer();
        let builder = SentenceFeatureBuilder::new(&gaz, FeatureOptions::default());
        let log = MatchLog::new(&NullSink);
        let matrix = builder.sentence_features(&sentences()[0], &log);
        let top1 = builder.layout().range(2, FeatureBlock::Top1).unwrap();

        // "New" (token 2): "New York" is its anchor window
        let new_top1: ArrayView1<f64> = matrix.slice(s![2, top1.clone()]);
        assert_eq!(new_top1[0], 0.9);
        // "York" (token 3): "New York" is an earlier window -> context row
        let york_top1: ArrayView1<f64> = matrix.slice(s![3, top1]);
        assert_eq!(york_top1[3], 0.9);
        assert_eq!(york_top1[0], 0.0);
    }

    #[test]
    fn sentence_without_hits_is_zero() {
        let gaz = gazetteer();
        let builder = SentenceFeatureBuilder::new(&gaz, FeatureOptions::default().normalized(true));
        let corpus = builder.build_corpus(&sentences(), &NullSink);
        assert_eq!(corpus.sentences()[1].sum(), 0.0);

        let summary = corpus.summary();
        assert_eq!(summary.zero_sentences, 1);
        assert!(!summary.all_zero());
        assert_eq!(summary.tokens, 7);
    }

    #[test]
    fn empty_sentence_gives_empty_matrix() {
        let gaz = gazetteer();
        let builder = SentenceFeatureBuilder::new(&gaz, FeatureOptions::default());
        let corpus = builder.build_corpus(&[Vec::<String>::new()], &NullSink);
        assert_eq!(corpus.sentences()[0].dim(), (0, 90));
        assert!(corpus.summary().all_zero());
    }

    #[test]
    fn unmatched_corpus_is_all_zero() {
        let gaz = gazetteer();
        let builder = SentenceFeatureBuilder::new(&gaz, FeatureOptions::new(FeatureSet::all()));
        let corpus = builder.build_corpus(&[vec!["a", "b"], vec!["c"]], &NullSink);
        let summary = corpus.summary();
        assert!(summary.all_zero());
        assert_eq!(summary.distinct_matches, 0);
        assert!(summary.to_string().contains("All features 0?   true"));
    }

    #[test]
    fn summary_lists_sentence_sum_counts() {
        let summary = CorpusSummary {
            sentences: 5,
            tokens: 9,
            width: 90,
            zero_sentences: 2,
            distinct_matches: 1,
            sentence_sums: vec![1.5, 0.0, 2.0, 0.0, 1.5],
        };
        assert_eq!(summary.sum_histogram(), [(0.0, 2), (1.5, 2), (2.0, 1)]);
        assert!(summary
            .to_string()
            .contains("Sentence sums:    0x2 1.5x2 2x1\nAll features 0?   false"));
    }

    #[test]
    fn summary_elides_rare_sums() {
        let sums: Vec<f64> = (0..12u32).map(f64::from).collect();
        let summary = CorpusSummary {
            sentences: sums.len(),
            tokens: sums.len(),
            width: 90,
            zero_sentences: 1,
            distinct_matches: 0,
            sentence_sums: sums,
        };
        assert!(summary.to_string().contains("0x1 1x1 2x1 3x1 4x1 5x1 6x1 7x1 (+4 more)"));
    }

    #[test]
    fn corpus_run_reports_matches_once() {
        let gaz = gazetteer();
        let builder = SentenceFeatureBuilder::new(&gaz, FeatureOptions::default());
        let sink = CollectingSink::new();
        let corpus = builder.build_corpus(&sentences(), &sink);

        let mut contexts = sink.contexts();
        contexts.sort();
        assert_eq!(contexts, ["New York", "York"]);
        assert_eq!(corpus.distinct_matches(), 2);
    }
}
