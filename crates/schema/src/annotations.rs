//! Annotation extraction
//!
//! Collects repeatable annotations across a type's supertype chain and
//! unwraps repeated-container forms into individual contributions.

use crdgen_model::{
    AnnotationValue, EnumConstant, PrinterColumnSpec, SchemaSwapSpec, TypeDef, TypeIndex,
    ValidationRuleSpec,
};
use tracing::debug;

/// The universal root of the host type hierarchy; never walked.
pub const UNIVERSAL_ROOT: &str = "java.lang.Object";

/// The type itself followed by its ancestors, nearest first, stopping at the
/// universal root. Supertypes the collaborator did not describe are skipped.
fn hierarchy<'a>(def: &'a TypeDef, index: &'a dyn TypeIndex) -> Vec<&'a TypeDef> {
    let mut chain = vec![def];
    let mut pending: std::collections::VecDeque<&str> =
        def.supertypes.iter().map(String::as_str).collect();
    while let Some(name) = pending.pop_front() {
        if name == UNIVERSAL_ROOT || chain.iter().any(|d| d.fully_qualified_name == name) {
            continue;
        }
        match index.definition(name) {
            Some(ancestor) => {
                chain.push(ancestor);
                pending.extend(ancestor.supertypes.iter().map(String::as_str));
            }
            None => debug!("Supertype {} is not described in the type graph, skipping", name),
        }
    }
    chain
}

/// Validation rules declared on the type or any of its ancestors, in
/// self-first declaration order, containers unwrapped.
pub fn repeating_validation_rules(def: &TypeDef, index: &dyn TypeIndex) -> Vec<ValidationRuleSpec> {
    hierarchy(def, index)
        .into_iter()
        .flat_map(|d| d.annotations.iter())
        .flat_map(validation_rules_of)
        .collect()
}

/// Unwraps a single annotation into zero or more validation rules.
pub fn validation_rules_of(annotation: &AnnotationValue) -> Vec<ValidationRuleSpec> {
    match annotation {
        AnnotationValue::ValidationRule(rule) => vec![rule.clone()],
        AnnotationValue::ValidationRules(rules) => rules.clone(),
        _ => Vec::new(),
    }
}

/// Type-level printer columns declared on the type or any of its ancestors.
pub fn repeating_printer_columns(def: &TypeDef, index: &dyn TypeIndex) -> Vec<PrinterColumnSpec> {
    hierarchy(def, index)
        .into_iter()
        .flat_map(|d| d.annotations.iter())
        .filter_map(|a| match a {
            AnnotationValue::AdditionalPrinterColumn(column) => Some(column.clone()),
            _ => None,
        })
        .collect()
}

/// Schema swaps declared directly on the type, containers unwrapped.
pub fn schema_swaps(def: &TypeDef) -> Vec<SchemaSwapSpec> {
    def.annotations
        .iter()
        .flat_map(|a| match a {
            AnnotationValue::SchemaSwap(swap) => vec![swap.clone()],
            AnnotationValue::SchemaSwaps(swaps) => swaps.clone(),
            _ => Vec::new(),
        })
        .collect()
}

/// The serialized name of an enum constant, or `None` when it is ignored.
pub fn effective_constant_name(constant: &EnumConstant) -> Option<String> {
    let mut name = constant.name.clone();
    for annotation in &constant.annotations {
        match annotation {
            AnnotationValue::Ignore => return None,
            AnnotationValue::Rename(renamed) if !renamed.is_empty() => {
                name = renamed.clone();
            }
            _ => {}
        }
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crdgen_model::{InMemoryTypeIndex, TypeRef};

    #[test]
    fn test_validation_rules_walk_supertype_chain() {
        let base = TypeDef::new("com.example.Base")
            .with_annotation(AnnotationValue::ValidationRule(ValidationRuleSpec::new(
                "self.base != ''",
            )))
            .with_supertype(UNIVERSAL_ROOT);
        let child = TypeDef::new("com.example.Child")
            .with_annotation(AnnotationValue::ValidationRules(vec![
                ValidationRuleSpec::new("self.a > 0"),
                ValidationRuleSpec::new("self.b > 0"),
            ]))
            .with_supertype("com.example.Base");

        let index = InMemoryTypeIndex::from_definitions(vec![base, child.clone()]);
        let rules = repeating_validation_rules(&child, &index);
        let expressions: Vec<&str> = rules.iter().map(|r| r.rule.as_str()).collect();
        assert_eq!(expressions, vec!["self.a > 0", "self.b > 0", "self.base != ''"]);
    }

    #[test]
    fn test_missing_supertype_is_skipped() {
        let child = TypeDef::new("com.example.Child").with_supertype("com.example.NotDescribed");
        let index = InMemoryTypeIndex::new();
        assert!(repeating_validation_rules(&child, &index).is_empty());
    }

    #[test]
    fn test_schema_swaps_unwraps_container() {
        let swap_a = SchemaSwapSpec::new(
            TypeRef::complex("com.example.A"),
            "left",
            TypeRef::complex("com.example.B"),
        );
        let swap_b = SchemaSwapSpec::new(
            TypeRef::complex("com.example.A"),
            "right",
            TypeRef::Void,
        );
        let def = TypeDef::new("com.example.Root")
            .with_annotation(AnnotationValue::SchemaSwaps(vec![swap_a.clone(), swap_b.clone()]));

        assert_eq!(schema_swaps(&def), vec![swap_a, swap_b]);
    }

    #[test]
    fn test_effective_constant_name() {
        let plain = EnumConstant::new("UP");
        let renamed = EnumConstant::new("DOWN")
            .with_annotation(AnnotationValue::Rename("down".to_string()));
        let ignored = EnumConstant::new("INTERNAL").with_annotation(AnnotationValue::Ignore);

        assert_eq!(effective_constant_name(&plain), Some("UP".to_string()));
        assert_eq!(effective_constant_name(&renamed), Some("down".to_string()));
        assert_eq!(effective_constant_name(&ignored), None);
    }
}
