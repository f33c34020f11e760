//! Generated CustomResourceDefinition model
//!
//! The in-memory representation handed to the serialization collaborator.
//! Serialization to YAML/JSON documents is not owned by this crate.

use crdgen_model::{PrinterColumnSpec, Scope};
use crdgen_schema::SchemaNode;
use serde::Serialize;
use std::collections::BTreeMap;

/// Naming of a generated definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Names {
    pub kind: String,
    pub singular: String,
    pub plural: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short_names: Vec<String>,
}

/// Scale subresource paths resolved from property markers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSubresource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_replicas_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_replicas_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_selector_path: Option<String>,
}

impl ScaleSubresource {
    pub fn is_empty(&self) -> bool {
        self.spec_replicas_path.is_none()
            && self.status_replicas_path.is_none()
            && self.label_selector_path.is_none()
    }
}

/// Subresources of one version.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subresources {
    pub status: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleSubresource>,
}

/// A printer column of the generated definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterColumnDef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub column_type: String,

    pub json_path: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub priority: i32,
}

impl From<PrinterColumnSpec> for PrinterColumnDef {
    fn from(spec: PrinterColumnSpec) -> Self {
        Self {
            name: spec.name,
            column_type: spec.column_type,
            json_path: spec.json_path,
            format: spec.format,
            description: spec.description,
            priority: spec.priority,
        }
    }
}

/// One generated API version of a definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinitionVersion {
    pub name: String,

    pub served: bool,

    /// `None` when the descriptor left the flag unspecified; treated as true
    /// by the multi-version merge for backward compatibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_warning: Option<String>,

    /// The structural schema for `openAPIV3Schema`
    pub schema: SchemaNode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subresources: Option<Subresources>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_printer_columns: Vec<PrinterColumnDef>,
}

/// A generated CustomResourceDefinition, possibly merged across versions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinition {
    /// Definition name, `<plural>.<group>`
    pub name: String,

    pub group: String,

    pub scope: Scope,

    pub names: Names,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Versions in priority order after merging
    pub versions: Vec<CustomResourceDefinitionVersion>,
}
