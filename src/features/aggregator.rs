//! Feature aggregation for one token and one span length.

use crate::diagnostics::MatchLog;
use crate::gazetteer::Gazetteer;
use crate::span::spans_containing;
use crate::transliterate::{Identity, Transliterator};

use super::{
    FeatureFamily, FeatureOptions, SpanAccumulator, Top1Row, MARGIN_PAIRS,
    MIN_MARGIN_CANDIDATES, MIN_RANKED_CANDIDATES, TOP30_LIMIT, TOP3_RANKS,
};

/// Turns candidate lookups over a token's windows into accumulators.
#[derive(Clone, Copy)]
pub struct FeatureAggregator<'a> {
    gazetteer: &'a Gazetteer,
    options: FeatureOptions,
    transliterator: &'a dyn Transliterator,
}

impl<'a> FeatureAggregator<'a> {
    /// Aggregator that looks contexts up verbatim.
    #[must_use]
    pub fn new(gazetteer: &'a Gazetteer, options: FeatureOptions) -> Self {
        Self {
            gazetteer,
            options,
            transliterator: &Identity,
        }
    }

    /// Convert every context with `transliterator` before lookup.
    #[must_use]
    pub fn with_transliterator(mut self, transliterator: &'a dyn Transliterator) -> Self {
        self.transliterator = transliterator;
        self
    }

    /// The gazetteer being consulted.
    #[must_use]
    pub fn gazetteer(&self) -> &'a Gazetteer {
        self.gazetteer
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> FeatureOptions {
        self.options
    }

    /// Accumulate the evidence of every length-`n` window containing
    /// `token`.
    ///
    /// A window contributes nothing when it runs outside the sentence, when
    /// its (converted) context is not exactly `n` tokens, or when the
    /// context has no candidates. Candidates whose entity has no type are
    /// ignored by the typed features; margins use every candidate.
    pub fn aggregate<S: AsRef<str>>(
        &self,
        tokens: &[S],
        token: usize,
        n: usize,
        matches: &MatchLog<'_>,
    ) -> SpanAccumulator {
        let features = self.options.features;
        let top1 = features.contains(FeatureFamily::Top1);
        let top3 = features.contains(FeatureFamily::Top3);
        let top30 = features.contains(FeatureFamily::Top30);
        let margin = features.contains(FeatureFamily::Margin);

        let windows = spans_containing(token, tokens.len(), n);
        let mut acc = SpanAccumulator::new(self.gazetteer.num_types());

        for (rank, window) in windows.iter().enumerate() {
            let Some(text) = window.context(tokens) else {
                continue;
            };
            let context = self.transliterator.transliterate(&text);
            if context.is_empty() || context.split_whitespace().count() != n {
                continue;
            }
            let Some(candidates) = self.gazetteer.lookup(&context) else {
                continue;
            };
            matches.record(&context, candidates);

            if top1 {
                if let Some(best) = candidates.top() {
                    if let Some(code) = self.gazetteer.type_of(best) {
                        acc.add_top1(Top1Row::for_rank(rank, windows.len()), code, best.weight);
                    }
                }
            }

            if candidates.len() < MIN_RANKED_CANDIDATES {
                continue;
            }

            if top3 {
                for (k, candidate) in candidates.top_k(TOP3_RANKS).iter().enumerate() {
                    if let Some(code) = self.gazetteer.type_of(candidate) {
                        acc.add_top3(k, code, candidate.weight);
                    }
                }
            }

            if top30 {
                for candidate in candidates.top_k(TOP30_LIMIT) {
                    if let Some(code) = self.gazetteer.type_of(candidate) {
                        acc.add_top30(code);
                    }
                }
            }

            if candidates.len() < MIN_MARGIN_CANDIDATES {
                continue;
            }

            if margin {
                let ranked = candidates.as_slice();
                for k in 0..MARGIN_PAIRS {
                    acc.add_margin(k, ranked[k].weight - ranked[k + 1].weight);
                }
            }
        }

        if self.options.normalize {
            acc.normalize(windows.len());
        }
        acc
    }
}

impl std::fmt::Debug for FeatureAggregator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureAggregator")
            .field("num_types", &self.gazetteer.num_types())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
