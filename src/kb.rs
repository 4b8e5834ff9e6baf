//! Knowledge-base type lookup.
//!
//! The knowledge base is a line-oriented file:
//!
//! ```text
//! Q90 ||| Paris ||| LOC
//! Q7186 ||| Marie Curie ||| PER
//! Q4167410 ||| Paris (disambiguation) ||| null
//! ```
//!
//! Only the entity id and the type label are used. Rows typed `null` are
//! left out, and a later row for the same entity replaces an earlier one.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use softgaz_core::{TypeCode, TypeRegistry};

use crate::{Error, Result, FIELD_SEPARATOR};

/// Type label marking an entity without a usable NER type.
pub const NULL_TYPE: &str = "null";

/// Entity id → type code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeLookup {
    types: HashMap<String, TypeCode>,
}

impl TypeLookup {
    /// Create an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entity's type, returning the code it replaced.
    pub fn insert(&mut self, entity_id: impl Into<String>, code: TypeCode) -> Option<TypeCode> {
        self.types.insert(entity_id.into(), code)
    }

    /// Type code of an entity, if it is typed.
    #[must_use]
    pub fn get(&self, entity_id: &str) -> Option<TypeCode> {
        self.types.get(entity_id).copied()
    }

    /// Whether an entity is typed.
    #[must_use]
    pub fn contains(&self, entity_id: &str) -> bool {
        self.types.contains_key(entity_id)
    }

    /// Number of typed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no entity is typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load from a knowledge-base file.
    pub fn from_path(path: impl AsRef<Path>, registry: &TypeRegistry) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("knowledge base {}: {e}", path.display()),
            ))
        })?;
        Self::from_reader(BufReader::new(file), registry, &path.display().to_string())
    }

    /// Load from any buffered reader. `source` names the input in errors.
    ///
    /// A row with fewer than three fields, or with a type label the
    /// registry cannot resolve, is a fatal parse error.
    pub fn from_reader<R: BufRead>(reader: R, registry: &TypeRegistry, source: &str) -> Result<Self> {
        let mut lookup = Self::new();
        let mut null_rows = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
            let [entity_id, _name, type_label, ..] = fields.as_slice() else {
                return Err(Error::parse_at(
                    source,
                    idx + 1,
                    format!("expected 'id{FIELD_SEPARATOR}name{FIELD_SEPARATOR}type', got '{line}'"),
                ));
            };

            if *type_label == NULL_TYPE {
                null_rows += 1;
                continue;
            }

            let code = registry.code(type_label).ok_or_else(|| {
                Error::parse_at(
                    source,
                    idx + 1,
                    format!(
                        "entity type '{type_label}' is not one of [{}]",
                        registry.labels().join(", ")
                    ),
                )
            })?;
            lookup.insert(*entity_id, code);
        }

        log::info!(
            "Loaded {} typed entities from {} ({} null rows skipped)",
            lookup.len(),
            source,
            null_rows
        );
        Ok(lookup)
    }
}

impl<S: Into<String>> FromIterator<(S, TypeCode)> for TypeLookup {
    fn from_iter<I: IntoIterator<Item = (S, TypeCode)>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for (id, code) in iter {
            lookup.insert(id, code);
        }
        lookup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use softgaz_core::TypeAlias;

    fn registry() -> TypeRegistry {
        TypeRegistry::register(["LOC", "PER", "ORG"])
            .unwrap()
            .with_alias(&TypeAlias::geopolitical())
            .unwrap()
    }

    fn load(text: &str) -> Result<TypeLookup> {
        TypeLookup::from_reader(text.as_bytes(), &registry(), "kb")
    }

    #[test]
    fn loads_types_and_skips_null() {
        let kb = load("Q90 ||| Paris ||| LOC\nQ1 ||| Ada ||| PER\nQ2 ||| thing ||| null\n").unwrap();
        assert_eq!(kb.get("Q90"), Some(0));
        assert_eq!(kb.get("Q1"), Some(1));
        assert_eq!(kb.get("Q2"), None);
        assert_eq!(kb.len(), 2);
    }

    #[test]
    fn alias_labels_resolve() {
        let kb = load("Q142 ||| France ||| GPE\n").unwrap();
        assert_eq!(kb.get("Q142"), Some(0));
    }

    #[test]
    fn last_row_wins() {
        let kb = load("Q5 ||| x ||| PER\nQ5 ||| x ||| ORG\n").unwrap();
        assert_eq!(kb.get("Q5"), Some(2));
    }

    #[test]
    fn null_row_does_not_erase_earlier_type() {
        let kb = load("Q5 ||| x ||| PER\nQ5 ||| x ||| null\n").unwrap();
        assert_eq!(kb.get("Q5"), Some(1));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let kb = load("\n  \nQ1 ||| a ||| ORG\n\n").unwrap();
        assert_eq!(kb.len(), 1);
    }

    #[test]
    fn short_row_is_fatal() {
        let err = load("Q1 ||| a ||| ORG\nQ2 ||| b\n").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(err.to_string().contains("kb:2"));
    }

    #[test]
    fn unknown_type_is_fatal() {
        let err = load("Q1 ||| a ||| DATE\n").unwrap_err();
        assert!(err.to_string().contains("DATE"));
    }

    #[test]
    fn from_iter() {
        let kb: TypeLookup = [("Q1", 0), ("Q2", 2)].into_iter().collect();
        assert_eq!(kb.get("Q2"), Some(2));
    }
}
