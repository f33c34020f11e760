//! Custom resource descriptors

use crate::types::TypeDef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a custom resource is namespaced or cluster-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    Namespaced,
    Cluster,
}

impl Scope {
    pub fn value(&self) -> &'static str {
        match self {
            Scope::Namespaced => "Namespaced",
            Scope::Cluster => "Cluster",
        }
    }
}

/// Everything the type-discovery collaborator knows about one custom resource
/// type at one API version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomResourceInfo {
    /// API group, e.g. `example.com`
    pub group: String,

    /// API version, e.g. `v1beta1`
    pub version: String,

    /// Resource kind
    pub kind: String,

    /// Singular name
    pub singular: String,

    /// Plural name
    pub plural: String,

    /// Short names, possibly empty
    pub short_names: Vec<String>,

    /// Resource scope
    pub scope: Scope,

    /// Whether this version is the storage version; `None` when unspecified
    pub storage: Option<bool>,

    /// Whether this version is served
    pub served: bool,

    /// Whether this version is deprecated
    pub deprecated: bool,

    /// Deprecation warning returned to clients, if any
    pub deprecation_warning: Option<String>,

    /// Metadata annotations for the generated definition
    pub annotations: BTreeMap<String, String>,

    /// Metadata labels for the generated definition
    pub labels: BTreeMap<String, String>,

    /// Root type descriptor of the resource
    pub definition: TypeDef,

    /// Whether the resource declares a status subresource
    pub has_status: bool,
}

impl CustomResourceInfo {
    /// The generated definition name, `<plural>.<group>`.
    pub fn crd_name(&self) -> String {
        format!("{}.{}", self.plural, self.group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crd_name() {
        let info = CustomResourceInfo {
            group: "example.com".to_string(),
            version: "v1".to_string(),
            kind: "Widget".to_string(),
            singular: "widget".to_string(),
            plural: "widgets".to_string(),
            short_names: vec![],
            scope: Scope::Namespaced,
            storage: Some(true),
            served: true,
            deprecated: false,
            deprecation_warning: None,
            annotations: BTreeMap::new(),
            labels: BTreeMap::new(),
            definition: TypeDef::new("com.example.Widget"),
            has_status: false,
        };
        assert_eq!(info.crd_name(), "widgets.example.com");
        assert_eq!(info.scope.value(), "Namespaced");
    }
}
