//! Result types for generation runs

use crate::crd::CustomResourceDefinition;
use crate::GeneratorError;
use std::collections::BTreeSet;

/// One successfully generated (and merged) definition.
#[derive(Debug, Clone)]
pub struct GeneratedDefinition {
    /// Definition name, `<plural>.<group>`
    pub name: String,

    /// The merged definition
    pub definition: CustomResourceDefinition,

    /// Fully-qualified names of every type that contributed to the schema,
    /// for downstream dependency tracking
    pub dependent_types: BTreeSet<String>,

    /// Opaque output location token, assigned by the writing collaborator
    pub location: Option<String>,
}

/// A per-definition failure; sibling definitions are unaffected.
#[derive(Debug)]
pub struct GenerationFailure {
    /// Definition name, when known
    pub name: String,

    pub error: GeneratorError,
}

/// Aggregate outcome of one generation run. Partial success is normal: the
/// failures list accompanies whatever was generated.
#[derive(Debug, Default)]
pub struct GenerationInfo {
    pub definitions: Vec<GeneratedDefinition>,
    pub failures: Vec<GenerationFailure>,
}

impl GenerationInfo {
    pub fn definition(&self, name: &str) -> Option<&GeneratedDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Records where the writing collaborator placed a definition.
    pub fn set_location(&mut self, name: &str, location: impl Into<String>) {
        if let Some(definition) = self.definitions.iter_mut().find(|d| d.name == name) {
            definition.location = Some(location.into());
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
