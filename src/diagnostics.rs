//! First-match diagnostics.
//!
//! The first time a run sees an n-gram with candidates, it reports the
//! match to a [`MatchSink`]. Reports never feed back into the features;
//! they only make it visible which n-grams a corpus actually hits.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use softgaz_core::CandidateList;

/// Receiver of first-match reports.
pub trait MatchSink: Send + Sync {
    /// Called once per distinct matched context per run.
    fn first_match(&self, context: &str, candidates: &CandidateList);
}

/// Logs matches at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MatchSink for LogSink {
    fn first_match(&self, context: &str, candidates: &CandidateList) {
        log::info!("Match found: {} -> {}", context, candidates);
    }
}

/// Discards matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MatchSink for NullSink {
    fn first_match(&self, _context: &str, _candidates: &CandidateList) {}
}

/// Keeps matches in memory, in report order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    matches: Mutex<Vec<(String, CandidateList)>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contexts reported so far.
    #[must_use]
    pub fn contexts(&self) -> Vec<String> {
        lock(&self.matches).iter().map(|(c, _)| c.clone()).collect()
    }

    /// Everything reported so far.
    #[must_use]
    pub fn matches(&self) -> Vec<(String, CandidateList)> {
        lock(&self.matches).clone()
    }
}

impl MatchSink for CollectingSink {
    fn first_match(&self, context: &str, candidates: &CandidateList) {
        lock(&self.matches).push((context.to_string(), candidates.clone()));
    }
}

/// Per-run record of contexts already reported.
///
/// Create one per corpus run; it is safe to share across the threads of
/// that run.
pub struct MatchLog<'s> {
    seen: Mutex<HashSet<String>>,
    sink: &'s dyn MatchSink,
}

impl<'s> MatchLog<'s> {
    /// Empty log reporting to `sink`.
    #[must_use]
    pub fn new(sink: &'s dyn MatchSink) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            sink,
        }
    }

    /// Report `context` unless this run already did.
    pub fn record(&self, context: &str, candidates: &CandidateList) {
        let first = {
            let mut seen = lock(&self.seen);
            !seen.contains(context) && seen.insert(context.to_string())
        };
        if first {
            self.sink.first_match(context, candidates);
        }
    }

    /// Number of distinct contexts reported.
    #[must_use]
    pub fn distinct_matches(&self) -> usize {
        lock(&self.seen).len()
    }
}

impl std::fmt::Debug for MatchLog<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchLog")
            .field("distinct_matches", &self.distinct_matches())
            .finish_non_exhaustive()
    }
}

/// Lock a mutex, recovering the guard if a panicking thread poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_context_once() {
        let sink = CollectingSink::new();
        let log = MatchLog::new(&sink);
        let candidates = CandidateList::parse("Q90 | 0.9");

        log.record("Paris", &candidates);
        log.record("Paris", &candidates);
        log.record("Rome", &candidates);

        assert_eq!(sink.contexts(), ["Paris", "Rome"]);
        assert_eq!(log.distinct_matches(), 2);
    }

    #[test]
    fn separate_runs_report_again() {
        let sink = CollectingSink::new();
        let candidates = CandidateList::parse("Q90");
        MatchLog::new(&sink).record("Paris", &candidates);
        MatchLog::new(&sink).record("Paris", &candidates);
        assert_eq!(sink.matches().len(), 2);
    }

    #[test]
    fn null_sink_still_counts() {
        let log = MatchLog::new(&NullSink);
        log.record("Paris", &CandidateList::parse("Q90"));
        assert_eq!(log.distinct_matches(), 1);
    }
}
