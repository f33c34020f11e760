//! Per-version assembly and multi-version merge
//!
//! One handler instance accumulates the definitions generated by parallel
//! per-resource tasks and merges the versions of each definition when the
//! run finishes.

use crate::crd::{
    CustomResourceDefinition, CustomResourceDefinitionVersion, Names, PrinterColumnDef,
    ScaleSubresource, Subresources,
};
use crate::version;
use crate::GeneratorError;
use crdgen_model::CustomResourceInfo;
use crdgen_schema::annotations::repeating_printer_columns;
use crdgen_schema::{PathMarker, ResolvingContext, SchemaResolver, StructuralBuilder};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::sync::Mutex;
use tracing::debug;

/// Top-level properties of a custom resource that never enter the schema.
pub const ROOT_IGNORES: [&str; 3] = ["metadata", "apiVersion", "kind"];

/// Accumulates generated definitions and merges them on [`finish`].
///
/// Safe for concurrent `handle` calls; the accumulated collection is only
/// exposed through the explicit finish drain.
///
/// [`finish`]: CustomResourceHandler::finish
#[derive(Debug, Default)]
pub struct CustomResourceHandler {
    crds: Mutex<Vec<(CustomResourceDefinition, BTreeSet<String>)>>,
}

impl CustomResourceHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the schema for one custom resource descriptor and queues the
    /// resulting single-version definition for merging.
    pub fn handle(
        &self,
        info: &CustomResourceInfo,
        context: ResolvingContext<'_>,
    ) -> Result<(), GeneratorError> {
        let builder = StructuralBuilder::new();
        let mut resolver = SchemaResolver::new(&builder, context);
        let schema = resolver.resolve_root(&info.definition, &ROOT_IGNORES)?;

        let scale = ScaleSubresource {
            spec_replicas_path: resolver
                .single_path(PathMarker::SpecReplicas)
                .map(String::from),
            status_replicas_path: resolver
                .single_path(PathMarker::StatusReplicas)
                .map(String::from),
            label_selector_path: resolver
                .single_path(PathMarker::LabelSelector)
                .map(String::from),
        };
        let subresources = if info.has_status || !scale.is_empty() {
            Some(Subresources {
                status: info.has_status,
                scale: (!scale.is_empty()).then_some(scale),
            })
        } else {
            None
        };

        let version = CustomResourceDefinitionVersion {
            name: info.version.clone(),
            served: info.served,
            storage: info.storage,
            deprecated: info.deprecated.then_some(true),
            deprecation_warning: info.deprecation_warning.clone(),
            schema,
            subresources,
            additional_printer_columns: self.all_printer_columns(&resolver, info, context),
        };

        let definition = CustomResourceDefinition {
            name: info.crd_name(),
            group: info.group.clone(),
            scope: info.scope,
            names: Names {
                kind: info.kind.clone(),
                singular: info.singular.clone(),
                plural: info.plural.clone(),
                short_names: info.short_names.clone(),
            },
            annotations: info.annotations.clone(),
            labels: info.labels.clone(),
            versions: vec![version],
        };

        let dependents = resolver.dependent_types().clone();
        self.crds
            .lock()
            .expect("definition queue poisoned")
            .push((definition, dependents));
        Ok(())
    }

    /// Columns found on properties during the schema walk plus type-level
    /// column annotations, sorted by JSON path, identical entries collapsed.
    fn all_printer_columns(
        &self,
        resolver: &SchemaResolver<'_, StructuralBuilder>,
        info: &CustomResourceInfo,
        context: ResolvingContext<'_>,
    ) -> Vec<PrinterColumnDef> {
        let mut columns: Vec<PrinterColumnDef> = resolver
            .printer_columns()
            .iter()
            .cloned()
            .chain(repeating_printer_columns(&info.definition, context.index))
            .map(PrinterColumnDef::from)
            .collect();
        columns.sort_by(|a, b| a.json_path.cmp(&b.json_path));
        columns.dedup();
        columns
    }

    /// Drains the accumulated definitions, merging the versions of each
    /// definition name. A merge failure only affects its own definition.
    pub fn finish(&self) -> Vec<Result<(CustomResourceDefinition, BTreeSet<String>), GeneratorError>> {
        let drained = std::mem::take(
            &mut *self.crds.lock().expect("definition queue poisoned"),
        );

        let mut groups: IndexMap<String, Vec<(CustomResourceDefinition, BTreeSet<String>)>> =
            IndexMap::new();
        for entry in drained {
            groups.entry(entry.0.name.clone()).or_default().push(entry);
        }

        groups.into_values().map(Self::combine).collect()
    }

    fn combine(
        group: Vec<(CustomResourceDefinition, BTreeSet<String>)>,
    ) -> Result<(CustomResourceDefinition, BTreeSet<String>), GeneratorError> {
        if group.len() == 1 {
            let mut single = group;
            return Ok(single.remove(0));
        }

        let (primary, _) = &group[0];
        debug!("Merging {} versions of {}", group.len(), primary.name);

        let versions: Vec<CustomResourceDefinitionVersion> = group
            .iter()
            .flat_map(|(definition, _)| definition.versions.iter().cloned())
            .collect();
        let dependents: BTreeSet<String> = group
            .iter()
            .flat_map(|(_, dependents)| dependents.iter().cloned())
            .collect();

        // a missing storage flag counts as true for backward compatibility
        let storage_versions: Vec<String> = versions
            .iter()
            .filter(|v| v.storage.unwrap_or(true))
            .map(|v| v.name.clone())
            .collect();
        if storage_versions.len() > 1 {
            return Err(GeneratorError::MultipleStorageVersions {
                name: primary.name.clone(),
                versions: storage_versions,
            });
        }

        let merged = CustomResourceDefinition {
            versions: version::sort_by_priority(versions, |v| &v.name),
            ..primary.clone()
        };
        Ok((merged, dependents))
    }
}
