//! Entity type registry.
//!
//! Maps NER type labels (`LOC`, `PER`, `ORG`, ...) to dense integer codes
//! in `0..num_types`. The codes index the type axis of every feature
//! accumulator, so the registry fixes the feature width for a run.
//!
//! One label can be folded into another with a [`TypeAlias`]. The usual
//! case is geopolitical entities, which knowledge bases often tag `GPE`
//! while the tagger only knows `LOC`:
//!
//! ```rust
//! use softgaz_core::{TypeAlias, TypeRegistry};
//!
//! let registry = TypeRegistry::register(["LOC", "PER", "ORG"])
//!     .unwrap()
//!     .with_alias(&TypeAlias::geopolitical())
//!     .unwrap();
//!
//! assert_eq!(registry.num_types(), 3);
//! assert_eq!(registry.code("GPE"), registry.code("LOC"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dense index of an entity type, in `0..num_types`.
pub type TypeCode = usize;

/// Rule folding a secondary label into the code of a registered label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeAlias {
    /// Label that gets folded (e.g. `GPE`).
    pub label: String,
    /// Registered label whose code it receives (e.g. `LOC`).
    pub target: String,
    /// When set, the alias is silently dropped if it cannot apply
    /// (target not registered, or label already registered).
    #[serde(default)]
    pub optional: bool,
}

impl TypeAlias {
    /// Create a required alias: applying it fails if `target` is missing.
    #[must_use]
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            optional: false,
        }
    }

    /// Mark the alias as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// `GPE` folded into `LOC`, applied only when `LOC` is registered.
    #[must_use]
    pub fn geopolitical() -> Self {
        Self::new("GPE", "LOC").optional()
    }
}

impl fmt::Display for TypeAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.label, self.target)
    }
}

impl FromStr for TypeAlias {
    type Err = Error;

    /// Parse `LABEL=TARGET`.
    fn from_str(s: &str) -> Result<Self> {
        let (label, target) = s
            .split_once('=')
            .ok_or_else(|| Error::invalid_input(format!("alias '{s}' is not LABEL=TARGET")))?;
        let (label, target) = (label.trim(), target.trim());
        if label.is_empty() || target.is_empty() {
            return Err(Error::invalid_input(format!(
                "alias '{s}' has an empty side"
            )));
        }
        Ok(Self::new(label, target))
    }
}

/// Ordered set of entity type labels with dense codes.
///
/// Immutable once built; aliases never change [`num_types`](Self::num_types).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRegistry {
    labels: Vec<String>,
    codes: HashMap<String, TypeCode>,
    aliases: Vec<TypeAlias>,
}

impl TypeRegistry {
    /// Assign codes `0..n` to `labels` in input order.
    ///
    /// Labels are trimmed. Fails on an empty list, a blank label, or a
    /// duplicate label.
    pub fn register<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self {
            labels: Vec::new(),
            codes: HashMap::new(),
            aliases: Vec::new(),
        };

        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() {
                return Err(Error::configuration("blank entity type label"));
            }
            if registry.codes.contains_key(label) {
                return Err(Error::configuration(format!(
                    "duplicate entity type label '{label}'"
                )));
            }
            registry.codes.insert(label.to_string(), registry.labels.len());
            registry.labels.push(label.to_string());
        }

        if registry.labels.is_empty() {
            return Err(Error::configuration("no entity types registered"));
        }
        Ok(registry)
    }

    /// Fold `alias.label` into the code of `alias.target`.
    ///
    /// A required alias fails when its target is not a registered label
    /// or when its label is already registered. An optional alias is
    /// skipped in those cases.
    pub fn with_alias(mut self, alias: &TypeAlias) -> Result<Self> {
        let problem = if self.is_alias(&alias.target) {
            Some(format!(
                "alias target '{}' is itself an alias",
                alias.target
            ))
        } else if !self.codes.contains_key(&alias.target) {
            Some(format!("alias target '{}' is not registered", alias.target))
        } else if self.codes.contains_key(&alias.label) {
            Some(format!("alias label '{}' is already registered", alias.label))
        } else {
            None
        };

        match problem {
            Some(_) if alias.optional => Ok(self),
            Some(msg) => Err(Error::configuration(msg)),
            None => {
                let code = self.codes[&alias.target];
                self.codes.insert(alias.label.clone(), code);
                self.aliases.push(alias.clone());
                Ok(self)
            }
        }
    }

    /// Code for a label or an alias.
    #[must_use]
    pub fn code(&self, label: &str) -> Option<TypeCode> {
        self.codes.get(label).copied()
    }

    /// Registered (non-alias) label for a code.
    #[must_use]
    pub fn label(&self, code: TypeCode) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    /// Registered labels in code order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Aliases that were applied.
    #[must_use]
    pub fn aliases(&self) -> &[TypeAlias] {
        &self.aliases
    }

    /// Whether `label` resolves through an alias.
    #[must_use]
    pub fn is_alias(&self, label: &str) -> bool {
        self.aliases.iter().any(|a| a.label == label)
    }

    /// Number of distinct codes.
    #[must_use]
    pub fn num_types(&self) -> usize {
        self.labels.len()
    }
}
