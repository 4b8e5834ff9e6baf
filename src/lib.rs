//! # softgaz
//!
//! Soft-gazetteer features for named entity recognition.
//!
//! Every token of a sentence gets a fixed-width vector describing how the
//! n-grams around it (lengths 1 to 3) resolve against a candidate table of
//! knowledge-base entities:
//!
//! - **top1**: weight of the best candidate, by type, split between the
//!   window starting at the token and the windows that only contain it
//! - **top3**: type counts and weights of the three best candidates
//! - **top30**: type counts over the (up to) 30 best candidates
//! - **margin**: weight gaps between consecutive ranks
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use softgaz::diagnostics::LogSink;
//! use softgaz::{conll, FeatureConfig, Gazetteer, SentenceFeatureBuilder};
//!
//! # fn main() -> softgaz::Result<()> {
//! let config = FeatureConfig::default();
//! let gazetteer = Gazetteer::load(&config, "kb.txt", "candidates.txt")?;
//! let sentences = conll::read_sentences_from_path("test.conll")?;
//!
//! let builder = SentenceFeatureBuilder::new(&gazetteer, config.options());
//! let corpus = builder.build_corpus(&sentences, &LogSink);
//! println!("{}", corpus.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature flags
//!
//! - `parallel` (default): sentences are processed on rayon's thread pool
//! - `cli` (default): the `softgaz` binary

#![warn(missing_docs)]

pub mod builder;
pub mod candidates;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod conll;
pub mod diagnostics;
pub mod error;
pub mod features;
pub mod gazetteer;
pub mod kb;
pub mod output;
pub mod span;
pub mod transliterate;

/// Separator between fields of knowledge-base and candidate-table lines.
pub const FIELD_SEPARATOR: &str = " ||| ";

pub use builder::{CorpusFeatures, CorpusSummary, SentenceFeatureBuilder};
pub use candidates::NgramCandidateTable;
pub use config::FeatureConfig;
pub use error::{Error, Result};
pub use features::{
    FeatureBlock, FeatureFamily, FeatureLayout, FeatureOptions, FeatureSet, FeatureVector,
    SentenceFeatureMatrix,
};
pub use gazetteer::Gazetteer;
pub use kb::TypeLookup;
pub use softgaz_core::{Candidate, CandidateList, TypeAlias, TypeCode, TypeRegistry};
