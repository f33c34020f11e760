//! Structural schema tree
//!
//! A [`SchemaNode`] is the in-memory result of schema resolution. It is built
//! bottom-up, immutable once returned, and serializes to the JSON-Schema
//! subset legal in a CustomResourceDefinition's `openAPIV3Schema` field.

use crdgen_model::ValidationRuleSpec;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// The four scalar markers a CRD structural schema supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Integer => "integer",
            ScalarKind::Number => "number",
            ScalarKind::Boolean => "boolean",
        }
    }
}

/// The structural shape of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// One of the four scalar types
    Scalar(ScalarKind),

    /// Accepts either an integer or a string; marked with
    /// `x-kubernetes-int-or-string`
    IntOrString,

    /// Array of a single element schema
    Array { items: Box<SchemaNode> },

    /// String-keyed map; the value schema goes to `additionalProperties`
    Map { value: Box<SchemaNode> },

    /// Closed set of string values, always sorted
    Enum { values: Vec<String> },

    /// Object with named properties
    Object(ObjectSchema),
}

/// Object-shaped schema contents.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    /// Property schemas, in resolution order
    pub properties: IndexMap<String, SchemaNode>,

    /// Names of required properties, sorted lexicographically
    pub required: Vec<String>,

    /// Validation rules attached at the object level
    pub validation_rules: Vec<ValidationRuleSpec>,

    /// Whether unknown fields below this node are preserved
    pub preserve_unknown_fields: bool,
}

/// Attributes shared by every node kind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaMetadata {
    pub description: Option<String>,
    pub default: Option<serde_json::Value>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub pattern: Option<String>,
    pub nullable: bool,
    pub format: Option<String>,
    /// Property-level validation rules
    pub validation_rules: Vec<ValidationRuleSpec>,
}

/// One node of the structural schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub metadata: SchemaMetadata,
}

impl SchemaNode {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            metadata: SchemaMetadata::default(),
        }
    }

    pub fn scalar(kind: ScalarKind) -> Self {
        Self::new(SchemaKind::Scalar(kind))
    }

    pub fn int_or_string() -> Self {
        let mut node = Self::new(SchemaKind::IntOrString);
        node.metadata.format = Some("int-or-string".to_string());
        node
    }

    pub fn array(items: SchemaNode) -> Self {
        Self::new(SchemaKind::Array {
            items: Box::new(items),
        })
    }

    pub fn map(value: SchemaNode) -> Self {
        Self::new(SchemaKind::Map {
            value: Box::new(value),
        })
    }

    pub fn enumeration(values: Vec<String>) -> Self {
        Self::new(SchemaKind::Enum { values })
    }

    pub fn object(object: ObjectSchema) -> Self {
        Self::new(SchemaKind::Object(object))
    }

    /// The `type` keyword this node serializes with, if any.
    pub fn type_name(&self) -> Option<&'static str> {
        match &self.kind {
            SchemaKind::Scalar(kind) => Some(kind.as_str()),
            SchemaKind::Enum { .. } => Some("string"),
            SchemaKind::Array { .. } => Some("array"),
            SchemaKind::Map { .. } | SchemaKind::Object(_) => Some("object"),
            SchemaKind::IntOrString => None,
        }
    }

    /// The object contents when this node is object-shaped.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &self.kind {
            SchemaKind::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        if let Some(type_name) = self.type_name() {
            map.serialize_entry("type", type_name)?;
        }
        if let Some(format) = &self.metadata.format {
            map.serialize_entry("format", format)?;
        }
        if let Some(description) = &self.metadata.description {
            map.serialize_entry("description", description)?;
        }
        if let Some(default) = &self.metadata.default {
            map.serialize_entry("default", default)?;
        }
        if let Some(minimum) = &self.metadata.minimum {
            map.serialize_entry("minimum", minimum)?;
        }
        if let Some(maximum) = &self.metadata.maximum {
            map.serialize_entry("maximum", maximum)?;
        }
        if let Some(pattern) = &self.metadata.pattern {
            map.serialize_entry("pattern", pattern)?;
        }
        if self.metadata.nullable {
            map.serialize_entry("nullable", &true)?;
        }

        match &self.kind {
            SchemaKind::Enum { values } => {
                map.serialize_entry("enum", values)?;
            }
            SchemaKind::Array { items } => {
                map.serialize_entry("items", items)?;
            }
            SchemaKind::Map { value } => {
                map.serialize_entry("additionalProperties", value)?;
            }
            SchemaKind::Object(object) => {
                if !object.properties.is_empty() {
                    map.serialize_entry("properties", &object.properties)?;
                }
                if !object.required.is_empty() {
                    map.serialize_entry("required", &object.required)?;
                }
                if object.preserve_unknown_fields {
                    map.serialize_entry("x-kubernetes-preserve-unknown-fields", &true)?;
                }
                if !object.validation_rules.is_empty() {
                    map.serialize_entry("x-kubernetes-validations", &object.validation_rules)?;
                }
            }
            SchemaKind::IntOrString => {
                map.serialize_entry("x-kubernetes-int-or-string", &true)?;
            }
            SchemaKind::Scalar(_) => {}
        }

        if !self.metadata.validation_rules.is_empty() && !matches!(self.kind, SchemaKind::Object(_))
        {
            map.serialize_entry("x-kubernetes-validations", &self.metadata.validation_rules)?;
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_serialization() {
        let node = SchemaNode::scalar(ScalarKind::Integer);
        assert_eq!(serde_json::to_value(&node).unwrap(), json!({"type": "integer"}));
    }

    #[test]
    fn test_int_or_string_keeps_format_marker() {
        let node = SchemaNode::int_or_string();
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"format": "int-or-string", "x-kubernetes-int-or-string": true})
        );
    }

    #[test]
    fn test_object_serialization() {
        let mut object = ObjectSchema::default();
        object
            .properties
            .insert("replicas".to_string(), SchemaNode::scalar(ScalarKind::Integer));
        object.required.push("replicas".to_string());
        object.preserve_unknown_fields = true;

        let value = serde_json::to_value(SchemaNode::object(object)).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["replicas"]["type"], "integer");
        assert_eq!(value["required"], json!(["replicas"]));
        assert_eq!(value["x-kubernetes-preserve-unknown-fields"], true);
    }

    #[test]
    fn test_map_serialization() {
        let node = SchemaNode::map(SchemaNode::scalar(ScalarKind::String));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["additionalProperties"]["type"], "string");
    }

    #[test]
    fn test_enum_serializes_as_string_type() {
        let node = SchemaNode::enumeration(vec!["Down".to_string(), "Up".to_string()]);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["type"], "string");
        assert_eq!(value["enum"], json!(["Down", "Up"]));
    }
}
