//! # softgaz-core
//!
//! Core types shared by the softgaz crates.
//!
//! - **Type registry**: `TypeRegistry`, `TypeAlias`, `TypeCode`
//! - **Candidates**: `Candidate`, `CandidateList` and their text format
//!
//! Nothing here does I/O; loaders live in `softgaz`.

#![warn(missing_docs)]

pub mod candidate;
pub mod error;
pub mod registry;

pub use candidate::{
    Candidate, CandidateList, CANDIDATE_SEPARATOR, DEFAULT_WEIGHT, WEIGHT_SEPARATOR,
};
pub use error::{Error, Result};
pub use registry::{TypeAlias, TypeCode, TypeRegistry};
