//! CLI modules for the softgaz binary.
//!
//! Kept in the library so commands can be tested without spawning the
//! binary.

pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use parser::{Cli, Commands};
