//! CRD Generator Library
//!
//! Generates CustomResourceDefinition content from a resolved type graph:
//! each custom resource descriptor is resolved to a structural schema, the
//! per-version results are merged, and the aggregate reports successes and
//! failures side by side.

pub mod config;
pub mod crd;
pub mod handler;
pub mod result;
pub mod version;

pub use config::GenerationConfig;
pub use crd::{
    CustomResourceDefinition, CustomResourceDefinitionVersion, Names, PrinterColumnDef,
    ScaleSubresource, Subresources,
};
pub use handler::CustomResourceHandler;
pub use result::{GeneratedDefinition, GenerationFailure, GenerationInfo};

pub use crdgen_model::{
    AccessorDef, AccessorKind, AnnotationValue, CustomResourceInfo, EnumConstant,
    InMemoryTypeIndex, PrinterColumnSpec, PropertyDef, Scope, SchemaSwapSpec, TypeDef, TypeIndex,
    TypeRef, ValidationRuleSpec,
};
pub use crdgen_schema::{
    PlatformTypeCache, ResolvingContext, RuntimeIntrospector, ScalarKind, SchemaError, SchemaNode,
    SchemaResolver, StructuralBuilder,
};

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

/// Generator error types
#[derive(thiserror::Error, Debug)]
pub enum GeneratorError {
    /// Schema resolution failed for one definition
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// More than one version of a definition is marked as storage
    #[error("'{name}' custom resource has versions {versions:?} marked as storage. Only one version can be marked as storage per custom resource.")]
    MultipleStorageVersions { name: String, versions: Vec<String> },

    /// A generation task died without producing a result
    #[error("generation task aborted: {reason}")]
    TaskAborted { reason: String },
}

/// Coordinates schema generation across all supplied custom resources.
///
/// Each resource is generated on its own task over a fixed-size worker pool;
/// a failing resource never aborts its siblings unless `fail_fast` is set.
/// The platform classification cache is shared across the whole run.
pub struct CrdGenerator {
    config: GenerationConfig,
    platform: Arc<PlatformTypeCache>,
}

impl Default for CrdGenerator {
    fn default() -> Self {
        Self::new(GenerationConfig::default())
    }
}

impl CrdGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            config,
            platform: Arc::new(PlatformTypeCache::default()),
        }
    }

    /// Replaces the platform classification backend for this run.
    pub fn with_introspector(mut self, introspector: Box<dyn RuntimeIntrospector>) -> Self {
        self.platform = Arc::new(PlatformTypeCache::new(introspector));
        self
    }

    /// Generates and merges definitions for every supplied descriptor.
    pub async fn generate(
        &self,
        index: Arc<dyn TypeIndex>,
        resources: Vec<CustomResourceInfo>,
    ) -> Result<GenerationInfo> {
        info!("Generating CRDs for {} custom resources", resources.len());

        let handler = Arc::new(CustomResourceHandler::new());
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));

        let mut tasks = Vec::with_capacity(resources.len());
        for info in resources {
            let handler = Arc::clone(&handler);
            let index = Arc::clone(&index);
            let platform = Arc::clone(&self.platform);
            let semaphore = Arc::clone(&semaphore);
            tasks.push(tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .expect("worker pool semaphore closed");
                let name = info.crd_name();
                let context = ResolvingContext {
                    index: index.as_ref(),
                    platform: platform.as_ref(),
                };
                let outcome = handler.handle(&info, context);
                (name, outcome)
            }));
        }

        let mut generation = GenerationInfo::default();
        for task in futures::future::join_all(tasks).await {
            let (name, outcome) = match task {
                Ok(result) => result,
                Err(join_error) => (
                    String::new(),
                    Err(GeneratorError::TaskAborted {
                        reason: join_error.to_string(),
                    }),
                ),
            };
            if let Err(error) = outcome {
                error!("Failed to generate CRD for {}: {}", name, error);
                if self.config.fail_fast {
                    return Err(anyhow::Error::from(error)
                        .context(format!("generation failed for '{name}'")));
                }
                generation.failures.push(GenerationFailure { name, error });
            }
        }

        for merged in handler.finish() {
            match merged {
                Ok((definition, dependent_types)) => {
                    info!(
                        "Generated {} with {} version(s)",
                        definition.name,
                        definition.versions.len()
                    );
                    generation.definitions.push(GeneratedDefinition {
                        name: definition.name.clone(),
                        definition,
                        dependent_types,
                        location: None,
                    });
                }
                Err(error) => {
                    error!("Failed to merge definition versions: {}", error);
                    let name = match &error {
                        GeneratorError::MultipleStorageVersions { name, .. } => name.clone(),
                        _ => String::new(),
                    };
                    if self.config.fail_fast {
                        return Err(anyhow::Error::from(error)
                            .context(format!("merge failed for '{name}'")));
                    }
                    generation.failures.push(GenerationFailure { name, error });
                }
            }
        }

        info!(
            "Generation completed: {} definition(s), {} failure(s)",
            generation.definitions.len(),
            generation.failures.len()
        );
        Ok(generation)
    }
}
