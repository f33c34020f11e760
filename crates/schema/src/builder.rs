//! Schema builder interface
//!
//! The resolver drives schema construction through this narrow interface so
//! that one resolution algorithm can serve multiple target representations.
//! [`StructuralBuilder`] is the CRD-v1 structural target.

use crate::node::{ObjectSchema, ScalarKind, SchemaNode};
use crdgen_model::{TypeRef, ValidationRuleSpec};
use indexmap::IndexMap;

/// Per-property attributes resolved by the property facade, applied by the
/// builder when the property is added to its enclosing object.
#[derive(Debug, Clone, Default)]
pub struct SchemaPropsOptions {
    pub default_value: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
    pub nullable: bool,
    pub preserve_unknown_fields: bool,
    pub validation_rules: Vec<ValidationRuleSpec>,
}

/// Construction interface consumed by the resolver.
pub trait SchemaBuilder {
    /// The finished schema representation
    type Schema: Clone + std::fmt::Debug;

    /// Intermediate state while an object's properties are collected
    type ObjectBuilder;

    /// Start an object schema.
    fn new_object(&self) -> Self::ObjectBuilder;

    /// Add a resolved property schema to an object under construction.
    fn add_property(
        &self,
        builder: &mut Self::ObjectBuilder,
        name: &str,
        schema: Self::Schema,
        options: &SchemaPropsOptions,
    );

    /// Finish an object schema.
    fn build_object(
        &self,
        builder: Self::ObjectBuilder,
        required: Vec<String>,
        validation_rules: Vec<ValidationRuleSpec>,
        preserve_unknown_fields: bool,
    ) -> Self::Schema;

    /// Schema for the specifically mapped (int-or-string) platform types.
    fn mapped_property(&self, type_ref: &TypeRef) -> Self::Schema;

    /// Wrap an element schema as an array.
    fn array_like_property(&self, items: Self::Schema) -> Self::Schema;

    /// Wrap a value schema as a string-keyed map.
    fn map_like_property(&self, value: Self::Schema) -> Self::Schema;

    /// Schema for one of the standard scalar types.
    fn single_property(&self, kind: ScalarKind) -> Self::Schema;

    /// Schema for a closed string enumeration; values arrive sorted.
    fn enum_property(&self, values: Vec<String>) -> Self::Schema;

    /// Attach a description to an already built schema.
    fn add_description(&self, schema: Self::Schema, description: &str) -> Self::Schema;
}

/// Builder for the structural schema embedded in a v1
/// CustomResourceDefinition.
#[derive(Debug, Clone, Default)]
pub struct StructuralBuilder;

impl StructuralBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Default values are annotation payloads carried as text; interpret them
    /// as JSON when possible, as a plain string otherwise.
    fn parse_default(raw: &str) -> serde_json::Value {
        serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
    }
}

impl SchemaBuilder for StructuralBuilder {
    type Schema = SchemaNode;
    type ObjectBuilder = IndexMap<String, SchemaNode>;

    fn new_object(&self) -> Self::ObjectBuilder {
        IndexMap::new()
    }

    fn add_property(
        &self,
        builder: &mut Self::ObjectBuilder,
        name: &str,
        mut schema: SchemaNode,
        options: &SchemaPropsOptions,
    ) {
        if let Some(raw) = &options.default_value {
            schema.metadata.default = Some(Self::parse_default(raw));
        }
        if options.min.is_some() {
            schema.metadata.minimum = options.min;
        }
        if options.max.is_some() {
            schema.metadata.maximum = options.max;
        }
        if let Some(pattern) = &options.pattern {
            schema.metadata.pattern = Some(pattern.clone());
        }
        if options.nullable {
            schema.metadata.nullable = true;
        }
        if !options.validation_rules.is_empty() {
            match &mut schema.kind {
                crate::node::SchemaKind::Object(object) => {
                    object
                        .validation_rules
                        .extend(options.validation_rules.iter().cloned());
                }
                _ => {
                    schema
                        .metadata
                        .validation_rules
                        .extend(options.validation_rules.iter().cloned());
                }
            }
        }
        if options.preserve_unknown_fields {
            if let crate::node::SchemaKind::Object(object) = &mut schema.kind {
                object.preserve_unknown_fields = true;
            }
        }
        builder.insert(name.to_string(), schema);
    }

    fn build_object(
        &self,
        builder: Self::ObjectBuilder,
        required: Vec<String>,
        validation_rules: Vec<ValidationRuleSpec>,
        preserve_unknown_fields: bool,
    ) -> SchemaNode {
        SchemaNode::object(ObjectSchema {
            properties: builder,
            required,
            validation_rules,
            preserve_unknown_fields,
        })
    }

    fn mapped_property(&self, _type_ref: &TypeRef) -> SchemaNode {
        SchemaNode::int_or_string()
    }

    fn array_like_property(&self, items: SchemaNode) -> SchemaNode {
        SchemaNode::array(items)
    }

    fn map_like_property(&self, value: SchemaNode) -> SchemaNode {
        SchemaNode::map(value)
    }

    fn single_property(&self, kind: ScalarKind) -> SchemaNode {
        SchemaNode::scalar(kind)
    }

    fn enum_property(&self, values: Vec<String>) -> SchemaNode {
        SchemaNode::enumeration(values)
    }

    fn add_description(&self, mut schema: SchemaNode, description: &str) -> SchemaNode {
        schema.metadata.description = Some(description.to_string());
        schema
    }
}
