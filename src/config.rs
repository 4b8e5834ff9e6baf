//! Run configuration.
//!
//! Settings can come from a TOML file, with command-line flags layered on
//! top:
//!
//! ```toml
//! ner_types = ["LOC", "PER", "ORG"]
//! features = ["top1", "top3", "top30", "margin"]
//! normalize = true
//!
//! [alias]
//! label = "GPE"
//! target = "LOC"
//! optional = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use softgaz_core::{TypeAlias, TypeRegistry};

use crate::features::{FeatureLayout, FeatureOptions, FeatureSet};
use crate::{Error, Result};

/// Default NER types, in code order.
pub const DEFAULT_NER_TYPES: [&str; 3] = ["LOC", "PER", "ORG"];

/// Everything that shapes the feature vectors of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    /// Entity type labels; their order fixes the type codes.
    pub ner_types: Vec<String>,
    /// Label folded into another label's code.
    pub alias: Option<TypeAlias>,
    /// Enabled feature families.
    pub features: FeatureSet,
    /// Normalize accumulators by window count.
    pub normalize: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            ner_types: DEFAULT_NER_TYPES.iter().map(|s| s.to_string()).collect(),
            alias: Some(TypeAlias::geopolitical()),
            features: FeatureSet::all(),
            normalize: false,
        }
    }
}

impl FeatureConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Set the NER types from a comma-separated list.
    #[must_use]
    pub fn with_ner_types_csv(mut self, csv: &str) -> Self {
        self.ner_types = csv.split(',').map(|s| s.trim().to_string()).collect();
        self
    }

    /// Check everything that can be checked without input files.
    pub fn validate(&self) -> Result<()> {
        self.registry()?;
        if self.features.is_empty() {
            log::warn!("No feature families enabled; every feature will be zero");
        }
        Ok(())
    }

    /// Build the type registry.
    pub fn registry(&self) -> Result<TypeRegistry> {
        let registry = TypeRegistry::register(&self.ner_types)?;
        Ok(match &self.alias {
            Some(alias) => registry.with_alias(alias)?,
            None => registry,
        })
    }

    /// Numeric options.
    #[must_use]
    pub fn options(&self) -> FeatureOptions {
        FeatureOptions::new(self.features).normalized(self.normalize)
    }

    /// Feature layout (requires a valid type list).
    pub fn layout(&self) -> Result<FeatureLayout> {
        Ok(FeatureLayout::new(self.registry()?.num_types()))
    }
}
