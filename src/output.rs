//! Serialization of corpus features.
//!
//! One JSON object per line and per sentence:
//!
//! ```text
//! {"sentence":0,"shape":[4,90],"features":[[0.0, ...], ...]}
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::builder::CorpusFeatures;
use crate::features::SentenceFeatureMatrix;
use crate::{Error, Result};

/// Suffix appended to the input file name.
pub const OUTPUT_SUFFIX: &str = "softgazfeats.jsonl";

/// Serialized form of one sentence matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// Sentence index in the input.
    pub sentence: usize,
    /// `[tokens, width]`.
    pub shape: [usize; 2],
    /// Row-major token vectors.
    pub features: Vec<Vec<f64>>,
}

impl SentenceRecord {
    /// Record for matrix `matrix` of sentence `sentence`.
    #[must_use]
    pub fn new(sentence: usize, matrix: &SentenceFeatureMatrix) -> Self {
        let (rows, cols) = matrix.dim();
        Self {
            sentence,
            shape: [rows, cols],
            features: matrix.rows().into_iter().map(|r| r.to_vec()).collect(),
        }
    }

    /// Rebuild the matrix.
    pub fn to_matrix(&self) -> Result<SentenceFeatureMatrix> {
        let [rows, cols] = self.shape;
        if self.features.len() != rows || self.features.iter().any(|r| r.len() != cols) {
            return Err(Error::serialization(format!(
                "sentence {}: rows do not match shape {rows}x{cols}",
                self.sentence
            )));
        }
        let flat: Vec<f64> = self.features.iter().flatten().copied().collect();
        SentenceFeatureMatrix::from_shape_vec((rows, cols), flat)
            .map_err(|e| Error::serialization(e.to_string()))
    }
}

/// Write every sentence as one JSON line.
///
/// JSON has no encoding for NaN or infinity, so a matrix holding one is
/// rejected instead of being written as `null`.
pub fn write_jsonl<W: Write>(mut writer: W, corpus: &CorpusFeatures) -> Result<()> {
    for (idx, matrix) in corpus.sentences().iter().enumerate() {
        if let Some(value) = matrix.iter().find(|v| !v.is_finite()) {
            return Err(Error::serialization(format!(
                "sentence {idx}: non-finite feature value {value}"
            )));
        }
        serde_json::to_writer(&mut writer, &SentenceRecord::new(idx, matrix))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read matrices back from JSON lines.
pub fn read_jsonl(text: &str) -> Result<Vec<SentenceFeatureMatrix>> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str::<SentenceRecord>(line)?.to_matrix())
        .collect()
}

/// `<output_dir>/<input file name>.softgazfeats.jsonl`
#[must_use]
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());
    output_dir.join(format!("{name}.{OUTPUT_SUFFIX}"))
}

/// Write the corpus to `path`.
pub fn write_to_path(path: &Path, corpus: &CorpusFeatures) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("output file {}: {e}", path.display()),
        ))
    })?;
    write_jsonl(BufWriter::new(file), corpus)?;
    log::info!("Wrote {} sentence matrices to {}", corpus.len(), path.display());
    Ok(())
}
