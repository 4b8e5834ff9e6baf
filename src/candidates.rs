//! N-gram candidate table.
//!
//! Candidate files come out of exact match, WikiMention, PBEL or any other
//! candidate generator, one n-gram per line:
//!
//! ```text
//! New York ||| Q60 | 0.93 || Q1384 | 0.05 || Q11299
//! ```
//!
//! Lines with fewer than two fields are skipped. A repeated n-gram
//! replaces the earlier entry.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use softgaz_core::CandidateList;

use crate::{Error, Result, FIELD_SEPARATOR};

/// Read-only map from an n-gram string to its ranked candidates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NgramCandidateTable {
    entries: HashMap<String, CandidateList>,
}

impl NgramCandidateTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the candidates of an n-gram.
    pub fn insert(&mut self, ngram: impl Into<String>, candidates: CandidateList) {
        self.entries.insert(ngram.into(), candidates);
    }

    /// Candidates for an n-gram; `None` is a miss.
    #[must_use]
    pub fn lookup(&self, ngram: &str) -> Option<&CandidateList> {
        self.entries.get(ngram)
    }

    /// Number of n-grams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no n-grams.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a candidate file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("candidate file {}: {e}", path.display()),
            ))
        })?;
        Self::from_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Load from any buffered reader. `source` names the input in logs.
    pub fn from_reader<R: BufRead>(reader: R, source: &str) -> Result<Self> {
        let mut table = Self::new();
        let mut skipped = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            let mut fields = line.split(FIELD_SEPARATOR);
            match (fields.next(), fields.next()) {
                (Some(ngram), Some(candidates)) => {
                    table.insert(ngram, CandidateList::parse(candidates));
                }
                _ => {
                    if !line.is_empty() {
                        log::debug!("{}:{}: no candidate field, skipped", source, idx + 1);
                    }
                    skipped += 1;
                }
            }
        }

        log::info!(
            "Loaded candidates for {} n-grams from {} ({} lines skipped)",
            table.len(),
            source,
            skipped
        );
        Ok(table)
    }
}

impl<S: Into<String>> FromIterator<(S, CandidateList)> for NgramCandidateTable {
    fn from_iter<I: IntoIterator<Item = (S, CandidateList)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (ngram, candidates) in iter {
            table.insert(ngram, candidates);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softgaz_core::Candidate;

    fn load(text: &str) -> NgramCandidateTable {
        NgramCandidateTable::from_reader(text.as_bytes(), "candidates").unwrap()
    }

    #[test]
    fn parses_lines() {
        let table = load("New York ||| Q60 | 0.93 || Q1384 | 0.05 || Q11299\nParis ||| Q90\n");
        let ny = table.lookup("New York").unwrap();
        assert_eq!(ny.len(), 3);
        assert_eq!(ny.get(0), Some(&Candidate::new("Q60", 0.93)));
        assert_eq!(ny.get(2), Some(&Candidate::new("Q11299", 1.0)));
        assert_eq!(table.lookup("Paris").unwrap().len(), 1);
    }

    #[test]
    fn unknown_ngram_is_a_miss() {
        let table = load("Paris ||| Q90\n");
        assert!(table.lookup("London").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn short_lines_are_skipped() {
        let table = load("orphan\n\nParis ||| Q90\nBerlin|||Q64\n");
        assert_eq!(table.len(), 1);
        assert!(table.lookup("orphan").is_none());
        assert!(table.lookup("Berlin|||Q64").is_none());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let table = load("Paris ||| Q90 | 0.5 ||| ignored\n");
        assert_eq!(table.lookup("Paris").unwrap().as_slice(), [Candidate::new("Q90", 0.5)]);
    }

    #[test]
    fn later_line_replaces_earlier() {
        let table = load("Paris ||| Q90\nParis ||| Q167646 | 0.2\n");
        assert_eq!(table.lookup("Paris").unwrap().top(), Some(&Candidate::new("Q167646", 0.2)));
    }

    #[test]
    fn malformed_weights_degrade() {
        let table = load("Rome ||| Q220 | high || Q1 | 0.3\n");
        let rome = table.lookup("Rome").unwrap();
        assert_eq!(rome.get(0), Some(&Candidate::new("Q220", 1.0)));
        assert_eq!(rome.get(1), Some(&Candidate::new("Q1", 0.3)));
    }
}
