//! Recursive schema builder
//!
//! Resolves a type descriptor into a structural schema node: unwraps
//! array/collection/map/optional wrappers, maps well-known platform types to
//! fixed shapes, closes enums, recurses into complex property types with
//! cycle detection, and consults the swap engine for every property.

use crate::annotations::{self, effective_constant_name};
use crate::builder::SchemaBuilder;
use crate::error::SchemaError;
use crate::facade::{resolve_property, PathMarker};
use crate::node::ScalarKind;
use crate::platform::{IntrospectedType, PlatformTypeCache};
use crate::swaps::SchemaSwaps;
use crdgen_model::{PrinterColumnSpec, TypeDef, TypeIndex, TypeRef};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

const QUANTITY_TYPE: &str = "io.fabric8.kubernetes.api.model.Quantity";
const INT_OR_STRING_TYPE: &str = "io.fabric8.kubernetes.api.model.IntOrString";
const DURATION_TYPE: &str = "io.fabric8.kubernetes.api.model.Duration";

/// Raw JSON carriers; resolved to an open object preserving unknown fields.
const RAW_JSON_TYPES: [&str; 2] = [
    "com.fasterxml.jackson.databind.JsonNode",
    "io.fabric8.kubernetes.api.model.AnyType",
];

fn well_known_scalar(name: &str) -> Option<ScalarKind> {
    match name {
        "java.lang.String" | "java.util.Date" | DURATION_TYPE => Some(ScalarKind::String),
        "java.lang.Short" | "java.lang.Integer" | "java.lang.Long" => Some(ScalarKind::Integer),
        "java.lang.Float" | "java.lang.Double" => Some(ScalarKind::Number),
        "java.lang.Boolean" => Some(ScalarKind::Boolean),
        _ => None,
    }
}

fn is_int_or_string(name: &str) -> bool {
    matches!(name, QUANTITY_TYPE | INT_OR_STRING_TYPE)
}

fn is_string_like_key(key: &TypeRef) -> bool {
    match key {
        TypeRef::String => true,
        TypeRef::Complex(name) => name == "java.lang.String",
        _ => false,
    }
}

/// The `type` marker a printer column reports for a property of `type_ref`.
fn column_type_marker(type_ref: &TypeRef) -> &'static str {
    match type_ref {
        TypeRef::Int | TypeRef::Long => "integer",
        TypeRef::Float | TypeRef::Double => "number",
        TypeRef::Bool => "boolean",
        TypeRef::Complex(name) => well_known_scalar(name).map_or("string", |k| k.as_str()),
        _ => "string",
    }
}

/// Shared lookups available while resolving one definition.
#[derive(Clone, Copy)]
pub struct ResolvingContext<'a> {
    pub index: &'a dyn TypeIndex,
    pub platform: &'a PlatformTypeCache,
}

/// Resolves type descriptors to schemas through a [`SchemaBuilder`].
///
/// One resolver instance covers one definition; it accumulates the dependent
/// type set, scale-subresource paths and in-schema printer columns found along
/// the way.
pub struct SchemaResolver<'a, B: SchemaBuilder> {
    builder: &'a B,
    context: ResolvingContext<'a>,
    dependent_types: BTreeSet<String>,
    single_paths: HashMap<PathMarker, String>,
    printer_columns: Vec<PrinterColumnSpec>,
    current_path: Vec<String>,
}

impl<'a, B: SchemaBuilder> SchemaResolver<'a, B> {
    pub fn new(builder: &'a B, context: ResolvingContext<'a>) -> Self {
        Self {
            builder,
            context,
            dependent_types: BTreeSet::new(),
            single_paths: HashMap::new(),
            printer_columns: Vec::new(),
            current_path: Vec::new(),
        }
    }

    /// Resolves the schema of a root definition, skipping the `ignore`d
    /// top-level properties.
    pub fn resolve_root(
        &mut self,
        definition: &TypeDef,
        ignore: &[&str],
    ) -> Result<B::Schema, SchemaError> {
        let mut visited = Vec::new();
        let swaps = SchemaSwaps::new();
        self.object_schema(definition, &mut visited, &swaps, ignore)
    }

    /// Every complex type that contributed to the resolved schema.
    pub fn dependent_types(&self) -> &BTreeSet<String> {
        &self.dependent_types
    }

    /// JSON path of the first property carrying the given marker, if any.
    pub fn single_path(&self, marker: PathMarker) -> Option<&str> {
        self.single_paths.get(&marker).map(String::as_str)
    }

    /// Printer columns found on properties during the walk.
    pub fn printer_columns(&self) -> &[PrinterColumnSpec] {
        &self.printer_columns
    }

    fn json_path(&self) -> String {
        format!(".{}", self.current_path.join("."))
    }

    fn open_object(&self) -> B::Schema {
        let builder = self.builder.new_object();
        self.builder
            .build_object(builder, Vec::new(), Vec::new(), false)
    }

    fn object_schema(
        &mut self,
        definition: &TypeDef,
        visited: &mut Vec<(String, String)>,
        parent_swaps: &SchemaSwaps,
        ignore: &[&str],
    ) -> Result<B::Schema, SchemaError> {
        let owner_ref = definition.to_reference();
        let mut swaps = parent_swaps.branch_annotations();
        for spec in annotations::schema_swaps(definition) {
            swaps.register(owner_ref.clone(), &spec)?;
        }

        let mut object = self.builder.new_object();
        let mut required: Vec<String> = Vec::new();
        let mut preserve_unknown_fields = false;

        for property in &definition.properties {
            if property.is_static || ignore.contains(&property.name.as_str()) {
                debug!("Ignoring property {}", property.name);
                continue;
            }

            let swap = swaps.lookup_and_mark(&owner_ref, &property.name);
            let accessors = definition.accessors_for(&property.name);
            let resolved = resolve_property(property, &accessors, swap.target.clone());

            if resolved.required {
                required.push(resolved.name.clone());
            } else if resolved.ignored {
                continue;
            }

            self.current_path.push(resolved.name.clone());
            for marker in &resolved.path_markers {
                let path = self.json_path();
                self.single_paths.entry(*marker).or_insert(path);
            }

            // a swapped property starts cycle detection afresh below itself
            let child_swaps = swaps.branch_depths();
            let outcome = if swap.matched {
                let mut fresh = Vec::new();
                self.schema_for(&resolved.name, &resolved.type_ref, &mut fresh, &child_swaps)
            } else {
                self.schema_for(&resolved.name, &resolved.type_ref, visited, &child_swaps)
            };
            let schema = match outcome {
                Ok(schema) => schema,
                Err(error) => {
                    self.current_path.pop();
                    return Err(error);
                }
            };

            if schema.is_some() {
                if let Some(request) = &resolved.printer_column {
                    self.printer_columns.push(PrinterColumnSpec {
                        name: request.name.clone().or_else(|| Some(resolved.name.clone())),
                        column_type: column_type_marker(&resolved.type_ref).to_string(),
                        json_path: self.json_path(),
                        format: request.format.clone(),
                        description: resolved.description.clone(),
                        priority: request.priority,
                    });
                }
            }
            self.current_path.pop();

            // an absent schema means the property is unrepresentable; drop it
            let Some(schema) = schema else {
                continue;
            };

            if resolved.preserve_unknown_fields {
                preserve_unknown_fields = true;
            }
            let schema = match &resolved.description {
                Some(text) => self.builder.add_description(schema, text),
                None => schema,
            };
            self.builder
                .add_property(&mut object, &resolved.name, schema, &resolved.schema_options());
        }

        let validation_rules =
            annotations::repeating_validation_rules(definition, self.context.index);
        swaps.ensure_all_matched()?;
        required.sort();
        required.dedup();
        Ok(self
            .builder
            .build_object(object, required, validation_rules, preserve_unknown_fields))
    }

    fn schema_for(
        &mut self,
        name: &str,
        type_ref: &TypeRef,
        visited: &mut Vec<(String, String)>,
        swaps: &SchemaSwaps,
    ) -> Result<Option<B::Schema>, SchemaError> {
        match type_ref {
            TypeRef::Array(element) | TypeRef::Collection(element) => Ok(self
                .schema_for(name, element, visited, swaps)?
                .map(|schema| self.builder.array_like_property(schema))),
            TypeRef::Map(key, value) => {
                if !is_string_like_key(key) {
                    warn!(
                        "Property '{}' with '{}' key type is mapped to 'string' because of CRD schemas limitations",
                        name, type_ref
                    );
                }
                let value_schema = match self.schema_for(name, value, visited, swaps) {
                    Ok(Some(schema)) => schema,
                    Ok(None) | Err(SchemaError::UnknownType { .. }) => {
                        warn!(
                            "Property '{}' with '{}' value type is mapped to 'object' because its CRD representation cannot be extracted",
                            name, type_ref
                        );
                        self.open_object()
                    }
                    Err(error) => return Err(error),
                };
                Ok(Some(self.builder.map_like_property(value_schema)))
            }
            // optionality never shows in the schema shape
            TypeRef::Optional(wrapped) => self.schema_for(name, wrapped, visited, swaps),
            TypeRef::Bool => Ok(Some(self.builder.single_property(ScalarKind::Boolean))),
            TypeRef::Int | TypeRef::Long => {
                Ok(Some(self.builder.single_property(ScalarKind::Integer)))
            }
            TypeRef::Float | TypeRef::Double => {
                Ok(Some(self.builder.single_property(ScalarKind::Number)))
            }
            TypeRef::String | TypeRef::Date => {
                Ok(Some(self.builder.single_property(ScalarKind::String)))
            }
            TypeRef::Void => Ok(None),
            TypeRef::Complex(fully_qualified_name) => {
                self.complex_schema(name, fully_qualified_name, type_ref, visited, swaps)
            }
        }
    }

    fn complex_schema(
        &mut self,
        name: &str,
        fully_qualified_name: &str,
        type_ref: &TypeRef,
        visited: &mut Vec<(String, String)>,
        swaps: &SchemaSwaps,
    ) -> Result<Option<B::Schema>, SchemaError> {
        // fixed mappings come first so specifically handled "complex" types
        // never reach generic resolution
        if is_int_or_string(fully_qualified_name) {
            return Ok(Some(self.builder.mapped_property(type_ref)));
        }
        if let Some(kind) = well_known_scalar(fully_qualified_name) {
            return Ok(Some(self.builder.single_property(kind)));
        }
        if RAW_JSON_TYPES.contains(&fully_qualified_name) {
            let builder = self.builder.new_object();
            return Ok(Some(
                self.builder
                    .build_object(builder, Vec::new(), Vec::new(), true),
            ));
        }
        match self.context.platform.classify(fully_qualified_name) {
            Some(IntrospectedType::Scalar(kind)) => {
                return Ok(Some(self.builder.single_property(kind)))
            }
            Some(IntrospectedType::ScalarArray(kind)) => {
                let element = self.builder.single_property(kind);
                return Ok(Some(self.builder.array_like_property(element)));
            }
            None => {}
        }

        let index = self.context.index;
        let definition =
            index
                .definition(fully_qualified_name)
                .ok_or_else(|| SchemaError::UnknownType {
                    name: fully_qualified_name.to_string(),
                })?;

        if definition.is_enum {
            self.dependent_types
                .insert(definition.fully_qualified_name.clone());
            let mut values: Vec<String> = definition
                .enum_constants
                .iter()
                .filter_map(effective_constant_name)
                .collect();
            values.sort();
            values.dedup();
            return Ok(Some(self.builder.enum_property(values)));
        }

        self.resolve_nested(name, definition, visited, swaps)
            .map(Some)
    }

    fn resolve_nested(
        &mut self,
        name: &str,
        definition: &TypeDef,
        visited: &mut Vec<(String, String)>,
        swaps: &SchemaSwaps,
    ) -> Result<B::Schema, SchemaError> {
        let fully_qualified_name = definition.fully_qualified_name.clone();
        self.dependent_types.insert(fully_qualified_name.clone());

        if visited.iter().any(|(seen, _)| *seen == fully_qualified_name) {
            let chain = visited
                .iter()
                .map(|(seen, via)| format!("{via}: {seen}"))
                .chain(std::iter::once(format!("{name}: {fully_qualified_name}")))
                .collect::<Vec<_>>()
                .join(" >> ");
            return Err(SchemaError::CyclicReference { chain });
        }

        visited.push((fully_qualified_name, name.to_string()));
        let result = self.object_schema(definition, visited, swaps, &[]);
        visited.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StructuralBuilder;
    use crate::node::SchemaNode;
    use crdgen_model::{
        AccessorDef, AccessorKind, AnnotationValue, EnumConstant, InMemoryTypeIndex, PropertyDef,
        SchemaSwapSpec,
    };
    use rstest::rstest;
    use serde_json::json;

    fn resolve(
        index: &InMemoryTypeIndex,
        root: &str,
    ) -> Result<SchemaNode, SchemaError> {
        let builder = StructuralBuilder::new();
        let platform = PlatformTypeCache::default();
        let context = ResolvingContext {
            index,
            platform: &platform,
        };
        let mut resolver = SchemaResolver::new(&builder, context);
        let definition = index.definition(root).unwrap().clone();
        resolver.resolve_root(&definition, &[])
    }

    #[test]
    fn test_pair_scenario() {
        let pair = TypeDef::new("com.example.Pair")
            .with_property(
                PropertyDef::new("a", TypeRef::Int)
                    .with_annotation(AnnotationValue::Min(1.0))
                    .with_annotation(AnnotationValue::Max(10.0)),
            )
            .with_property(PropertyDef::new("b", TypeRef::String))
            .with_accessor(
                AccessorDef::new(AccessorKind::Getter, "b")
                    .with_annotation(AnnotationValue::Rename("bee".to_string()))
                    .with_annotation(AnnotationValue::Required),
            );
        let index = InMemoryTypeIndex::from_definitions(vec![pair]);

        let schema = resolve(&index, "com.example.Pair").unwrap();
        let value = serde_json::to_value(&schema).unwrap();

        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["a"]["type"], "integer");
        assert_eq!(value["properties"]["a"]["minimum"], 1.0);
        assert_eq!(value["properties"]["a"]["maximum"], 10.0);
        assert_eq!(value["properties"]["bee"]["type"], "string");
        assert!(value["properties"].get("b").is_none());
        assert_eq!(value["required"], json!(["bee"]));
    }

    #[test]
    fn test_cyclic_reference_fails_with_chain() {
        let node = TypeDef::new("com.example.Node")
            .with_property(PropertyDef::new("next", TypeRef::complex("com.example.Node")));
        let root = TypeDef::new("com.example.Root")
            .with_property(PropertyDef::new("head", TypeRef::complex("com.example.Node")));
        let index = InMemoryTypeIndex::from_definitions(vec![node, root]);

        let error = resolve(&index, "com.example.Root").unwrap_err();
        let message = error.to_string();
        assert!(message.contains("cyclic reference"));
        assert!(message.contains("next"));
        assert!(message.contains("com.example.Node"));
    }

    #[test]
    fn test_schema_swap_breaks_cycle() {
        let leaf = TypeDef::new("com.example.Leaf")
            .with_property(PropertyDef::new("value", TypeRef::String));
        let node = TypeDef::new("com.example.Node")
            .with_property(PropertyDef::new("next", TypeRef::complex("com.example.Node")));
        let root = TypeDef::new("com.example.Root")
            .with_annotation(AnnotationValue::SchemaSwap(SchemaSwapSpec::new(
                TypeRef::complex("com.example.Node"),
                "next",
                TypeRef::complex("com.example.Leaf"),
            )))
            .with_property(PropertyDef::new("head", TypeRef::complex("com.example.Node")));
        let index = InMemoryTypeIndex::from_definitions(vec![leaf, node, root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            value["properties"]["head"]["properties"]["next"]["properties"]["value"]["type"],
            "string"
        );
    }

    #[test]
    fn test_swap_to_void_removes_property() {
        let node = TypeDef::new("com.example.Node")
            .with_property(PropertyDef::new("label", TypeRef::String))
            .with_property(PropertyDef::new("next", TypeRef::complex("com.example.Node")));
        let root = TypeDef::new("com.example.Root")
            .with_annotation(AnnotationValue::SchemaSwap(SchemaSwapSpec::new(
                TypeRef::complex("com.example.Node"),
                "next",
                TypeRef::Void,
            )))
            .with_property(PropertyDef::new("head", TypeRef::complex("com.example.Node")));
        let index = InMemoryTypeIndex::from_definitions(vec![node, root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["properties"]["head"]["properties"]["label"]["type"], "string");
        assert!(value["properties"]["head"]["properties"].get("next").is_none());
    }

    #[test]
    fn test_unmatched_swap_is_fatal() {
        let root = TypeDef::new("com.example.Root")
            .with_annotation(AnnotationValue::SchemaSwap(SchemaSwapSpec::new(
                TypeRef::complex("com.example.Root"),
                "doesNotExist",
                TypeRef::Void,
            )))
            .with_property(PropertyDef::new("name", TypeRef::String));
        let index = InMemoryTypeIndex::from_definitions(vec![root]);

        let error = resolve(&index, "com.example.Root").unwrap_err();
        assert!(matches!(error, SchemaError::UnmatchedSwaps { .. }));
    }

    #[test]
    fn test_optional_is_transparent() {
        let direct = TypeDef::new("com.example.Direct").with_property(PropertyDef::new(
            "values",
            TypeRef::Array(Box::new(TypeRef::String)),
        ));
        let wrapped = TypeDef::new("com.example.Wrapped").with_property(PropertyDef::new(
            "values",
            TypeRef::Optional(Box::new(TypeRef::Array(Box::new(TypeRef::String)))),
        ));
        let index = InMemoryTypeIndex::from_definitions(vec![direct, wrapped]);

        let direct_schema = resolve(&index, "com.example.Direct").unwrap();
        let wrapped_schema = resolve(&index, "com.example.Wrapped").unwrap();
        assert_eq!(direct_schema, wrapped_schema);
    }

    #[test]
    fn test_enum_is_sorted_renamed_and_closed() {
        let level = TypeDef::enumeration(
            "com.example.Level",
            vec![
                EnumConstant::new("WARN"),
                EnumConstant::new("ERROR")
                    .with_annotation(AnnotationValue::Rename("error".to_string())),
                EnumConstant::new("HIDDEN").with_annotation(AnnotationValue::Ignore),
            ],
        );
        let root = TypeDef::new("com.example.Root")
            .with_property(PropertyDef::new("level", TypeRef::complex("com.example.Level")));
        let index = InMemoryTypeIndex::from_definitions(vec![level, root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["properties"]["level"]["type"], "string");
        assert_eq!(value["properties"]["level"]["enum"], json!(["WARN", "error"]));
    }

    #[test]
    fn test_map_value_fallback_and_collections() {
        let root = TypeDef::new("com.example.Root")
            .with_property(PropertyDef::new(
                "labels",
                TypeRef::Map(Box::new(TypeRef::String), Box::new(TypeRef::String)),
            ))
            .with_property(PropertyDef::new(
                "counts",
                TypeRef::Map(Box::new(TypeRef::Int), Box::new(TypeRef::Long)),
            ))
            .with_property(PropertyDef::new(
                "matrix",
                TypeRef::Collection(Box::new(TypeRef::Collection(Box::new(TypeRef::Int)))),
            ))
            .with_property(PropertyDef::new(
                "anything",
                TypeRef::Map(Box::new(TypeRef::String), Box::new(TypeRef::Void)),
            ));
        let index = InMemoryTypeIndex::from_definitions(vec![root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["properties"]["labels"]["additionalProperties"]["type"], "string");
        // non-string keys are accepted with a warning
        assert_eq!(value["properties"]["counts"]["additionalProperties"]["type"], "integer");
        assert_eq!(
            value["properties"]["matrix"]["items"]["items"]["type"],
            "integer"
        );
        // unresolvable value schema falls back to an open object
        assert_eq!(value["properties"]["anything"]["additionalProperties"]["type"], "object");
    }

    #[test]
    fn test_well_known_platform_types() {
        let root = TypeDef::new("com.example.Root")
            .with_property(PropertyDef::new(
                "memory",
                TypeRef::complex(QUANTITY_TYPE),
            ))
            .with_property(PropertyDef::new(
                "timeout",
                TypeRef::complex(DURATION_TYPE),
            ))
            .with_property(PropertyDef::new(
                "port",
                TypeRef::complex(INT_OR_STRING_TYPE),
            ));
        let index = InMemoryTypeIndex::from_definitions(vec![root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["properties"]["memory"]["x-kubernetes-int-or-string"], true);
        assert_eq!(value["properties"]["timeout"]["type"], "string");
        assert_eq!(value["properties"]["port"]["x-kubernetes-int-or-string"], true);
    }

    #[test]
    fn test_raw_json_type_preserves_unknown_fields() {
        let root = TypeDef::new("com.example.Root").with_property(PropertyDef::new(
            "payload",
            TypeRef::complex("com.fasterxml.jackson.databind.JsonNode"),
        ));
        let index = InMemoryTypeIndex::from_definitions(vec![root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            value["properties"]["payload"]["x-kubernetes-preserve-unknown-fields"],
            true
        );
    }

    #[test]
    fn test_platform_classification_is_used() {
        let builder = StructuralBuilder::new();
        let platform = PlatformTypeCache::new(Box::new(|name: &str| match name {
            "java.time.Instant" => Some(IntrospectedType::Scalar(ScalarKind::String)),
            _ => None,
        }));
        let root = TypeDef::new("com.example.Root")
            .with_property(PropertyDef::new("at", TypeRef::complex("java.time.Instant")));
        let index = InMemoryTypeIndex::from_definitions(vec![root.clone()]);
        let context = ResolvingContext {
            index: &index,
            platform: &platform,
        };

        let mut resolver = SchemaResolver::new(&builder, context);
        let schema = resolver.resolve_root(&root, &[]).unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["properties"]["at"]["type"], "string");
    }

    #[test]
    fn test_unknown_complex_type_surfaces_collaborator_failure() {
        let root = TypeDef::new("com.example.Root").with_property(PropertyDef::new(
            "mystery",
            TypeRef::complex("com.example.NotDescribed"),
        ));
        let index = InMemoryTypeIndex::from_definitions(vec![root]);

        let error = resolve(&index, "com.example.Root").unwrap_err();
        assert!(matches!(error, SchemaError::UnknownType { .. }));
    }

    #[test]
    fn test_required_wins_over_ignored_and_ignored_drops_property() {
        let root = TypeDef::new("com.example.Root")
            .with_property(
                PropertyDef::new("keep", TypeRef::String)
                    .with_annotation(AnnotationValue::Required)
                    .with_annotation(AnnotationValue::Ignore),
            )
            .with_property(
                PropertyDef::new("drop", TypeRef::String)
                    .with_annotation(AnnotationValue::Ignore),
            );
        let index = InMemoryTypeIndex::from_definitions(vec![root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert!(value["properties"].get("keep").is_some());
        assert!(value["properties"].get("drop").is_none());
        assert_eq!(value["required"], json!(["keep"]));
    }

    #[test]
    fn test_static_properties_are_skipped() {
        let root = TypeDef::new("com.example.Root")
            .with_property(PropertyDef::new("CONSTANT", TypeRef::String).static_member())
            .with_property(PropertyDef::new("name", TypeRef::String));
        let index = InMemoryTypeIndex::from_definitions(vec![root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let object = schema.as_object().unwrap();
        assert!(object.properties.contains_key("name"));
        assert!(!object.properties.contains_key("CONSTANT"));
    }

    #[test]
    fn test_path_markers_and_printer_columns_are_collected() {
        let spec = TypeDef::new("com.example.WidgetSpec").with_property(
            PropertyDef::new("replicas", TypeRef::Int)
                .with_annotation(AnnotationValue::SpecReplicas)
                .with_annotation(AnnotationValue::PrinterColumn {
                    name: Some("Replicas".to_string()),
                    format: None,
                    priority: 0,
                }),
        );
        let root = TypeDef::new("com.example.Widget").with_property(PropertyDef::new(
            "spec",
            TypeRef::complex("com.example.WidgetSpec"),
        ));
        let index = InMemoryTypeIndex::from_definitions(vec![spec, root.clone()]);

        let builder = StructuralBuilder::new();
        let platform = PlatformTypeCache::default();
        let context = ResolvingContext {
            index: &index,
            platform: &platform,
        };
        let mut resolver = SchemaResolver::new(&builder, context);
        resolver.resolve_root(&root, &[]).unwrap();

        assert_eq!(
            resolver.single_path(PathMarker::SpecReplicas),
            Some(".spec.replicas")
        );
        let columns = resolver.printer_columns();
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].json_path, ".spec.replicas");
        assert_eq!(columns[0].column_type, "integer");
        assert_eq!(columns[0].name.as_deref(), Some("Replicas"));

        let dependents = resolver.dependent_types();
        assert!(dependents.contains("com.example.WidgetSpec"));
    }

    #[rstest]
    #[case(TypeRef::Bool, "boolean")]
    #[case(TypeRef::Int, "integer")]
    #[case(TypeRef::Long, "integer")]
    #[case(TypeRef::Float, "number")]
    #[case(TypeRef::Double, "number")]
    #[case(TypeRef::String, "string")]
    #[case(TypeRef::Date, "string")]
    fn test_scalar_table(#[case] type_ref: TypeRef, #[case] expected: &str) {
        let root =
            TypeDef::new("com.example.Root").with_property(PropertyDef::new("value", type_ref));
        let index = InMemoryTypeIndex::from_definitions(vec![root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["properties"]["value"]["type"], expected);
    }

    #[test]
    fn test_sibling_subtrees_are_unaffected_by_shared_types() {
        // the same type reachable through two sibling paths is not a cycle
        let shared = TypeDef::new("com.example.Shared")
            .with_property(PropertyDef::new("value", TypeRef::String));
        let root = TypeDef::new("com.example.Root")
            .with_property(PropertyDef::new("first", TypeRef::complex("com.example.Shared")))
            .with_property(PropertyDef::new("second", TypeRef::complex("com.example.Shared")));
        let index = InMemoryTypeIndex::from_definitions(vec![shared, root]);

        let schema = resolve(&index, "com.example.Root").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["properties"]["first"]["properties"]["value"]["type"], "string");
        assert_eq!(value["properties"]["second"]["properties"]["value"]["type"], "string");
    }
}
