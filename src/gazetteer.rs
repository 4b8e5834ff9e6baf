//! The three read-only tables a run consults: type registry, knowledge-base
//! type lookup and n-gram candidates.

use std::path::Path;

use softgaz_core::{Candidate, CandidateList, TypeCode, TypeRegistry};

use crate::candidates::NgramCandidateTable;
use crate::config::FeatureConfig;
use crate::features::FeatureLayout;
use crate::kb::TypeLookup;
use crate::Result;

/// Soft gazetteer: everything needed to type the candidates of an n-gram.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    registry: TypeRegistry,
    types: TypeLookup,
    candidates: NgramCandidateTable,
}

impl Gazetteer {
    /// Assemble from already-built tables.
    #[must_use]
    pub fn new(registry: TypeRegistry, types: TypeLookup, candidates: NgramCandidateTable) -> Self {
        Self {
            registry,
            types,
            candidates,
        }
    }

    /// Build the registry from `config` and load both files.
    pub fn load(
        config: &FeatureConfig,
        kb_path: impl AsRef<Path>,
        candidates_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let registry = config.registry()?;
        let types = TypeLookup::from_path(kb_path, &registry)?;
        let candidates = NgramCandidateTable::from_path(candidates_path)?;
        Ok(Self::new(registry, types, candidates))
    }

    /// Entity type registry.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Knowledge-base type lookup.
    #[must_use]
    pub fn types(&self) -> &TypeLookup {
        &self.types
    }

    /// N-gram candidate table.
    #[must_use]
    pub fn candidates(&self) -> &NgramCandidateTable {
        &self.candidates
    }

    /// Number of entity types.
    #[must_use]
    pub fn num_types(&self) -> usize {
        self.registry.num_types()
    }

    /// Feature layout for this registry.
    #[must_use]
    pub fn layout(&self) -> FeatureLayout {
        FeatureLayout::new(self.num_types())
    }

    /// Candidates of an n-gram.
    #[must_use]
    pub fn lookup(&self, ngram: &str) -> Option<&CandidateList> {
        self.candidates.lookup(ngram)
    }

    /// Type code of a candidate's entity, if the knowledge base types it.
    #[must_use]
    pub fn type_of(&self, candidate: &Candidate) -> Option<TypeCode> {
        self.types.get(&candidate.entity_id)
    }
}
