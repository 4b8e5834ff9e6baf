//! Command implementations for the softgaz CLI
//!
//! Each command has its own module/file.

pub mod features;
pub mod layout;
pub mod lookup;

// Re-export argument types for parser
pub use features::{cmd_features, FeaturesArgs};
pub use layout::{cmd_layout, LayoutArgs};
pub use lookup::{cmd_lookup, LookupArgs};
