//! Tokenized sentences from CoNLL-style tagging files.
//!
//! One token per line, first whitespace-delimited column; blank lines end
//! sentences. Every other column (POS, chunk, NER tag) is ignored.
//!
//! Document markers such as `-DOCSTART-` are tokens like any other, so
//! sentence `i` here is sentence `i` for any tagger reading the same file.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{Error, Result};

/// Tokens of one sentence.
pub type Sentence = Vec<String>;

/// Read sentences from a CoNLL file.
pub fn read_sentences_from_path(path: impl AsRef<Path>) -> Result<Vec<Sentence>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("input file {}: {e}", path.display()),
        ))
    })?;
    read_sentences(BufReader::new(file))
}

/// Read sentences from any buffered reader.
///
/// Runs of blank lines and the end of input never yield empty sentences.
pub fn read_sentences<R: BufRead>(reader: R) -> Result<Vec<Sentence>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let Some(token) = line.split_whitespace().next() else {
            if !current.is_empty() {
                sentences.push(std::mem::take(&mut current));
            }
            continue;
        };
        current.push(token.to_string());
    }

    if !current.is_empty() {
        sentences.push(current);
    }
    Ok(sentences)
}
