//! Property resolution
//!
//! One logical property can gather contributions from its field declaration
//! and up to three accessors. Resolution folds the contributors in a fixed
//! order into a single effective definition: the first contributor supplying
//! an attribute wins, later differing contributions are logged and dropped;
//! boolean markers accumulate with OR.

use crate::annotations::validation_rules_of;
use crate::builder::SchemaPropsOptions;
use crdgen_model::{
    AccessorDef, AccessorKind, AnnotationValue, PropertyDef, TypeRef, ValidationRuleSpec,
};
use tracing::debug;

/// Properties the scale subresource can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathMarker {
    SpecReplicas,
    StatusReplicas,
    LabelSelector,
}

/// A property-level printer column request; the JSON path and column type are
/// derived from the property's position and resolved type.
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterColumnRequest {
    pub name: Option<String>,
    pub format: Option<String>,
    pub priority: i32,
}

/// The decoded contribution of one contributor (field or accessor).
#[derive(Debug, Default)]
struct Contribution {
    source: String,
    renamed_to: Option<String>,
    description: Option<String>,
    default_value: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    pattern: Option<String>,
    validation_rules: Vec<ValidationRuleSpec>,
    nullable: bool,
    required: bool,
    ignored: bool,
    preserve_unknown_fields: bool,
    schema_from: Option<TypeRef>,
    printer_column: Option<PrinterColumnRequest>,
    path_markers: Vec<PathMarker>,
}

impl Contribution {
    fn decode(source: String, annotations: &[AnnotationValue]) -> Self {
        let mut contribution = Contribution {
            source,
            ..Contribution::default()
        };
        for annotation in annotations {
            match annotation {
                AnnotationValue::Rename(name) if !name.is_empty() => {
                    contribution.renamed_to = Some(name.clone());
                }
                AnnotationValue::Description(text) if !text.is_empty() => {
                    contribution.description = Some(text.clone());
                }
                AnnotationValue::Default(value) => {
                    contribution.default_value = Some(value.clone());
                }
                AnnotationValue::Min(value) => contribution.min = Some(*value),
                AnnotationValue::Max(value) => contribution.max = Some(*value),
                AnnotationValue::Pattern(pattern) => {
                    contribution.pattern = Some(pattern.clone());
                }
                AnnotationValue::Nullable => contribution.nullable = true,
                AnnotationValue::Required => contribution.required = true,
                AnnotationValue::Ignore => contribution.ignored = true,
                AnnotationValue::PreserveUnknownFields => {
                    contribution.preserve_unknown_fields = true;
                }
                AnnotationValue::SchemaFrom { type_ref } => {
                    contribution.schema_from = Some(type_ref.clone());
                }
                AnnotationValue::FormatShape(shape) => {
                    // the explicit substitution annotation takes precedence
                    if contribution.schema_from.is_none() {
                        contribution.schema_from = Some(shape.as_type_ref());
                    }
                }
                AnnotationValue::ValidationRule(_) | AnnotationValue::ValidationRules(_) => {
                    contribution
                        .validation_rules
                        .extend(validation_rules_of(annotation));
                }
                AnnotationValue::PrinterColumn {
                    name,
                    format,
                    priority,
                } => {
                    contribution.printer_column = Some(PrinterColumnRequest {
                        name: name.clone(),
                        format: format.clone(),
                        priority: *priority,
                    });
                }
                AnnotationValue::SpecReplicas => {
                    contribution.path_markers.push(PathMarker::SpecReplicas);
                }
                AnnotationValue::StatusReplicas => {
                    contribution.path_markers.push(PathMarker::StatusReplicas);
                }
                AnnotationValue::LabelSelector => {
                    contribution.path_markers.push(PathMarker::LabelSelector);
                }
                _ => {}
            }
        }
        contribution
    }
}

/// The effective definition of one property after all contributors merged.
#[derive(Debug, Clone)]
pub struct ResolvedProperty {
    /// Final serialized name, after any rename
    pub name: String,

    /// Final type reference, after any substitution
    pub type_ref: TypeRef,

    pub description: Option<String>,
    pub default_value: Option<String>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<String>,
    pub validation_rules: Vec<ValidationRuleSpec>,
    pub nullable: bool,
    pub required: bool,
    pub ignored: bool,
    pub preserve_unknown_fields: bool,
    pub printer_column: Option<PrinterColumnRequest>,
    pub path_markers: Vec<PathMarker>,
}

impl ResolvedProperty {
    /// The attribute bundle handed to the schema builder.
    pub fn schema_options(&self) -> SchemaPropsOptions {
        SchemaPropsOptions {
            default_value: self.default_value.clone(),
            min: self.min,
            max: self.max,
            pattern: self.pattern.clone(),
            nullable: self.nullable,
            preserve_unknown_fields: self.preserve_unknown_fields,
            validation_rules: self.validation_rules.clone(),
        }
    }
}

/// Running state of the contributor fold.
#[derive(Debug, Default)]
struct Merged {
    renamed_to: Option<(String, String)>,
    description: Option<(String, String)>,
    default_value: Option<(String, String)>,
    min: Option<(f64, String)>,
    max: Option<(f64, String)>,
    pattern: Option<(String, String)>,
    schema_from: Option<(TypeRef, String)>,
    printer_column: Option<(PrinterColumnRequest, String)>,
    validation_rules: Vec<ValidationRuleSpec>,
    nullable: bool,
    required: bool,
    ignored: bool,
    preserve_unknown_fields: bool,
    path_markers: Vec<PathMarker>,
}

impl Merged {
    fn merge(mut self, property: &str, contribution: Contribution) -> Self {
        let source = &contribution.source;

        merge_first(
            &mut self.renamed_to,
            contribution.renamed_to,
            source,
            property,
            "rename",
        );
        merge_first(
            &mut self.description,
            contribution.description,
            source,
            property,
            "description",
        );
        merge_first(
            &mut self.default_value,
            contribution.default_value,
            source,
            property,
            "default",
        );
        merge_first(&mut self.min, contribution.min, source, property, "min");
        merge_first(&mut self.max, contribution.max, source, property, "max");
        merge_first(
            &mut self.pattern,
            contribution.pattern,
            source,
            property,
            "pattern",
        );
        merge_first(
            &mut self.schema_from,
            contribution.schema_from,
            source,
            property,
            "schema substitution",
        );
        merge_first(
            &mut self.printer_column,
            contribution.printer_column,
            source,
            property,
            "printer column",
        );

        self.validation_rules.extend(contribution.validation_rules);
        self.nullable |= contribution.nullable;
        self.required |= contribution.required;
        self.ignored |= contribution.ignored;
        self.preserve_unknown_fields |= contribution.preserve_unknown_fields;
        for marker in contribution.path_markers {
            if !self.path_markers.contains(&marker) {
                self.path_markers.push(marker);
            }
        }
        self
    }
}

/// First contributor wins; a later, different value is logged and dropped.
fn merge_first<T: PartialEq + std::fmt::Debug>(
    slot: &mut Option<(T, String)>,
    value: Option<T>,
    source: &str,
    property: &str,
    attribute: &str,
) {
    let Some(value) = value else {
        return;
    };
    match slot {
        None => *slot = Some((value, source.to_string())),
        Some((kept, kept_by)) => {
            if *kept != value {
                debug!(
                    "{} for property {} has already been contributed by {}, ignoring value from {}",
                    attribute, property, kept_by, source
                );
            }
        }
    }
}

fn accessor_label(accessor: &AccessorDef) -> String {
    let kind = match accessor.kind {
        AccessorKind::Predicate => "predicate accessor",
        AccessorKind::Getter => "getter",
        AccessorKind::Setter => "setter",
    };
    format!("'{}' {}", accessor.property, kind)
}

/// Merges the contributions for one property into its effective definition.
///
/// Contributors are processed in field, predicate, getter, setter order;
/// `accessors` is expected in that order already (see
/// [`crdgen_model::TypeDef::accessors_for`]). A schema-swap override, when
/// present, takes precedence over any substitution annotation.
pub fn resolve_property(
    property: &PropertyDef,
    accessors: &[&AccessorDef],
    swap_override: Option<TypeRef>,
) -> ResolvedProperty {
    let field = Contribution::decode(format!("'{}' field", property.name), &property.annotations);
    let merged = accessors
        .iter()
        .map(|a| Contribution::decode(accessor_label(a), &a.annotations))
        .fold(Merged::default().merge(&property.name, field), |acc, c| {
            acc.merge(&property.name, c)
        });

    let type_ref = swap_override
        .or_else(|| merged.schema_from.as_ref().map(|(t, _)| t.clone()))
        .unwrap_or_else(|| property.type_ref.clone());
    let name = merged
        .renamed_to
        .map(|(n, _)| n)
        .unwrap_or_else(|| property.name.clone());

    ResolvedProperty {
        name,
        type_ref,
        description: merged.description.map(|(d, _)| d),
        default_value: merged.default_value.map(|(d, _)| d),
        min: merged.min.map(|(m, _)| m),
        max: merged.max.map(|(m, _)| m),
        pattern: merged.pattern.map(|(p, _)| p),
        validation_rules: merged.validation_rules,
        nullable: merged.nullable,
        required: merged.required,
        ignored: merged.ignored,
        preserve_unknown_fields: merged.preserve_unknown_fields,
        printer_column: merged.printer_column.map(|(c, _)| c),
        path_markers: merged.path_markers,
    }
}
