//! Utility functions for CLI commands

use std::path::Path;

use crate::{FeatureConfig, Gazetteer};

/// Fail early with a readable message when an input file is missing.
pub fn require_file(path: &Path, what: &str) -> Result<(), String> {
    if path.is_file() {
        Ok(())
    } else {
        Err(format!("{} file not found: {}", what, path.display()))
    }
}

/// Create the output directory if needed.
pub fn ensure_dir(path: &Path) -> Result<(), String> {
    std::fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create output directory {}: {}", path.display(), e))
}

/// Check both tables exist, then load them.
pub fn load_gazetteer(
    config: &FeatureConfig,
    kb: &Path,
    candidates: &Path,
) -> Result<Gazetteer, String> {
    require_file(kb, "knowledge base")?;
    require_file(candidates, "candidates")?;
    Gazetteer::load(config, kb, candidates).map_err(|e| e.to_string())
}
