//! Ranked entity-linking candidates.
//!
//! A candidate list is written as
//!
//! ```text
//! Q90 | 0.92 || Q167646 | 0.41 || Q1001
//! ```
//!
//! Candidates are separated by ` || `, and an optional weight follows the
//! entity id after ` | `. Parsing never fails: a missing, malformed or
//! non-finite weight becomes [`DEFAULT_WEIGHT`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between candidates in a list.
pub const CANDIDATE_SEPARATOR: &str = " || ";

/// Separator between an entity id and its weight.
pub const WEIGHT_SEPARATOR: &str = " | ";

/// Weight assigned when none can be read.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One entity-linking hypothesis for a span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Knowledge-base id (e.g. a Wikidata QID).
    pub entity_id: String,
    /// Linker confidence.
    pub weight: f64,
}

impl Candidate {
    /// Create a candidate.
    #[must_use]
    pub fn new(entity_id: impl Into<String>, weight: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            weight,
        }
    }

    /// Parse `entity_id | weight`.
    ///
    /// ```rust
    /// use softgaz_core::Candidate;
    ///
    /// assert_eq!(Candidate::parse("Q1 | 2.0"), Candidate::new("Q1", 2.0));
    /// assert_eq!(Candidate::parse("Q1"), Candidate::new("Q1", 1.0));
    /// assert_eq!(Candidate::parse("Q1 | bad"), Candidate::new("Q1", 1.0));
    /// assert_eq!(Candidate::parse("Q1 | inf"), Candidate::new("Q1", 1.0));
    /// ```
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let parts: Vec<&str> = token.split(WEIGHT_SEPARATOR).collect();
        if let [id, weight] = parts.as_slice() {
            match weight.trim().parse::<f64>() {
                Ok(weight) if weight.is_finite() => return Self::new(*id, weight),
                _ => {}
            }
        }
        Self::new(parts[0], DEFAULT_WEIGHT)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.entity_id, WEIGHT_SEPARATOR, self.weight)
    }
}

/// Candidates for one n-gram, best first.
///
/// Order is exactly the source order; nothing is re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateList {
    candidates: Vec<Candidate>,
}

impl CandidateList {
    /// Wrap already-ranked candidates.
    #[must_use]
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    /// Parse a ` || `-separated list.
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(CANDIDATE_SEPARATOR).map(Candidate::parse).collect())
    }

    /// Candidate at `rank` (0 = best).
    #[must_use]
    pub fn get(&self, rank: usize) -> Option<&Candidate> {
        self.candidates.get(rank)
    }

    /// Best candidate.
    #[must_use]
    pub fn top(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// The first `k` candidates (fewer if the list is shorter).
    #[must_use]
    pub fn top_k(&self, k: usize) -> &[Candidate] {
        &self.candidates[..k.min(self.candidates.len())]
    }

    /// All candidates in rank order.
    #[must_use]
    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Iterate in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

impl fmt::Display for CandidateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, candidate) in self.candidates.iter().enumerate() {
            if i > 0 {
                f.write_str(CANDIDATE_SEPARATOR)?;
            }
            write!(f, "{candidate}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_weight() {
        let c = Candidate::parse("Q1 | 2.0");
        assert_eq!(c.entity_id, "Q1");
        assert_eq!(c.weight, 2.0);
    }

    #[test]
    fn parse_defaults_weight() {
        assert_eq!(Candidate::parse("Q1"), Candidate::new("Q1", 1.0));
        assert_eq!(Candidate::parse("Q1 | bad"), Candidate::new("Q1", 1.0));
        assert_eq!(Candidate::parse("Q1 | "), Candidate::new("Q1", 1.0));
    }

    #[test]
    fn parse_rejects_non_finite_weights() {
        for raw in ["Q1 | inf", "Q1 | -inf", "Q1 | NaN", "Q1 | infinity"] {
            assert_eq!(Candidate::parse(raw), Candidate::new("Q1", DEFAULT_WEIGHT), "{raw}");
        }
        let list = CandidateList::parse("Q1 | inf || Q2 | 0.5");
        assert!(list.iter().all(|c| c.weight.is_finite()));
    }

    #[test]
    fn parse_too_many_parts_keeps_first() {
        assert_eq!(Candidate::parse("Q1 | 0.5 | 0.2"), Candidate::new("Q1", 1.0));
    }

    #[test]
    fn parse_scientific_weight() {
        assert_eq!(Candidate::parse("Q7 | 1e-3").weight, 0.001);
    }

    #[test]
    fn list_preserves_order() {
        let list = CandidateList::parse("Q3 | 0.1 || Q1 | 0.9 || Q2");
        let ids: Vec<&str> = list.iter().map(|c| c.entity_id.as_str()).collect();
        assert_eq!(ids, ["Q3", "Q1", "Q2"]);
        assert_eq!(list.get(2).map(|c| c.weight), Some(1.0));
        assert_eq!(list.top().map(|c| c.entity_id.as_str()), Some("Q3"));
    }

    #[test]
    fn top_k_is_clamped() {
        let list = CandidateList::parse("Q1 || Q2");
        assert_eq!(list.top_k(30).len(), 2);
        assert_eq!(list.top_k(1).len(), 1);
    }

    #[test]
    fn display_round_trips_weights() {
        let list = CandidateList::parse("Q1 | 0.5 || Q2");
        assert_eq!(list.to_string(), "Q1 | 0.5 || Q2 | 1");
    }
}
