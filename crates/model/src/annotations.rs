//! Decoded annotation markers
//!
//! The type-discovery collaborator decodes raw annotations into this fixed
//! vocabulary. Markers the decoder does not understand are carried as
//! [`AnnotationValue::Unknown`] and ignored downstream.

use crate::types::TypeRef;
use serde::{Deserialize, Serialize};

/// A single decoded annotation attached to a type, property, method or enum
/// constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnnotationValue {
    /// Rename the property (or enum constant) in the serialized form
    Rename(String),

    /// Human-readable description for the schema node
    Description(String),

    /// Default value, as its textual annotation payload
    Default(String),

    /// Inclusive numeric minimum
    Min(f64),

    /// Inclusive numeric maximum
    Max(f64),

    /// Regular expression constraint for string values
    Pattern(String),

    /// Value may be null
    Nullable,

    /// Property must be present
    Required,

    /// Property is excluded from the schema
    Ignore,

    /// Keep unknown fields below this node
    PreserveUnknownFields,

    /// Resolve the schema from another type instead of the declared one
    SchemaFrom { type_ref: TypeRef },

    /// Scoped, depth-bounded type substitution
    SchemaSwap(SchemaSwapSpec),

    /// Repeated-container form of [`AnnotationValue::SchemaSwap`]
    SchemaSwaps(Vec<SchemaSwapSpec>),

    /// A CEL validation rule
    ValidationRule(ValidationRuleSpec),

    /// Repeated-container form of [`AnnotationValue::ValidationRule`]
    ValidationRules(Vec<ValidationRuleSpec>),

    /// Surface this property as a printer column
    PrinterColumn {
        /// Column name; the property name is used when absent
        name: Option<String>,
        /// Display format hint
        format: Option<String>,
        /// Column priority
        priority: i32,
    },

    /// Type-level printer column with an explicit JSON path; repeatable
    AdditionalPrinterColumn(PrinterColumnSpec),

    /// Marks the replica-count property of the spec for the scale subresource
    SpecReplicas,

    /// Marks the replica-count property of the status for the scale subresource
    StatusReplicas,

    /// Marks the label-selector property for the scale subresource
    LabelSelector,

    /// Serialization shape override; substitutes the apparent scalar type
    FormatShape(FormatShape),

    /// Annotation kind the decoder does not understand; ignored
    Unknown(String),
}

/// Payload of a schema-swap annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSwapSpec {
    /// Type whose property is being substituted
    pub original_type: TypeRef,

    /// Name of the property on `original_type`
    pub field_name: String,

    /// Replacement type; [`TypeRef::Void`] removes the property
    pub target_type: TypeRef,

    /// Recursion levels below the annotated type the swap stays open for.
    /// `Some(0)` restricts it to the annotated type's own properties; `None`
    /// keeps it open for the whole branch.
    pub depth: Option<u32>,
}

impl SchemaSwapSpec {
    pub fn new(
        original_type: TypeRef,
        field_name: impl Into<String>,
        target_type: TypeRef,
    ) -> Self {
        Self {
            original_type,
            field_name: field_name.into(),
            target_type,
            depth: None,
        }
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }
}

/// Version-independent payload of a validation-rule annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRuleSpec {
    /// The CEL expression
    pub rule: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_expression: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_old_self: Option<bool>,
}

impl ValidationRuleSpec {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            message: None,
            message_expression: None,
            reason: None,
            field_path: None,
            optional_old_self: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Payload of a type-level printer-column annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterColumnSpec {
    /// Column name; may be left for the API server to default
    pub name: Option<String>,

    /// JSON-schema type of the column value
    pub column_type: String,

    /// JSON path of the surfaced value
    pub json_path: String,

    /// Display format hint
    pub format: Option<String>,

    /// Column description
    pub description: Option<String>,

    /// Column priority
    pub priority: i32,
}

impl PrinterColumnSpec {
    pub fn new(column_type: impl Into<String>, json_path: impl Into<String>) -> Self {
        Self {
            name: None,
            column_type: column_type.into(),
            json_path: json_path.into(),
            format: None,
            description: None,
            priority: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Serialization shape override for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatShape {
    Boolean,
    Number,
    NumberFloat,
    NumberInt,
    StringShape,
}

impl FormatShape {
    /// The scalar type this shape serializes as.
    pub fn as_type_ref(self) -> TypeRef {
        match self {
            FormatShape::Boolean => TypeRef::Bool,
            FormatShape::Number | FormatShape::NumberFloat => TypeRef::Double,
            FormatShape::NumberInt => TypeRef::Long,
            FormatShape::StringShape => TypeRef::String,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_shape_mapping() {
        assert_eq!(FormatShape::Boolean.as_type_ref(), TypeRef::Bool);
        assert_eq!(FormatShape::NumberInt.as_type_ref(), TypeRef::Long);
        assert_eq!(FormatShape::StringShape.as_type_ref(), TypeRef::String);
    }

    #[test]
    fn test_validation_rule_serializes_camel_case() {
        let rule = ValidationRuleSpec {
            rule: "self.replicas > 0".to_string(),
            field_path: Some(".replicas".to_string()),
            ..ValidationRuleSpec::new("")
        };
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(value["fieldPath"], ".replicas");
        assert!(value.get("messageExpression").is_none());
    }
}
