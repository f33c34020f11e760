//! Type descriptors and references

use crate::annotations::AnnotationValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Reference to a type as it appears in a property declaration.
///
/// Structural equality (and hashing) is required because references are used
/// as cache and swap-scope keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// Boolean scalar
    Bool,

    /// 32-bit integer scalar
    Int,

    /// 64-bit integer scalar
    Long,

    /// 32-bit floating point scalar
    Float,

    /// 64-bit floating point scalar
    Double,

    /// String scalar
    String,

    /// Timestamp scalar
    Date,

    /// Void / absent type; resolves to no schema at all
    Void,

    /// Array of the element type, one dimension per wrapping
    Array(Box<TypeRef>),

    /// Collection (list, set, ...) of the element type
    Collection(Box<TypeRef>),

    /// Map from key type to value type
    Map(Box<TypeRef>, Box<TypeRef>),

    /// Optional wrapper, transparent for schema purposes
    Optional(Box<TypeRef>),

    /// Named complex type, resolved through a [`TypeIndex`]
    Complex(String),
}

impl TypeRef {
    /// Shorthand for a named complex type reference.
    pub fn complex(name: impl Into<String>) -> Self {
        TypeRef::Complex(name.into())
    }

    /// The fully-qualified name for complex references, `None` otherwise.
    pub fn fully_qualified_name(&self) -> Option<&str> {
        match self {
            TypeRef::Complex(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeRef::Bool => write!(f, "bool"),
            TypeRef::Int => write!(f, "int"),
            TypeRef::Long => write!(f, "long"),
            TypeRef::Float => write!(f, "float"),
            TypeRef::Double => write!(f, "double"),
            TypeRef::String => write!(f, "string"),
            TypeRef::Date => write!(f, "date"),
            TypeRef::Void => write!(f, "void"),
            TypeRef::Array(element) => write!(f, "{element}[]"),
            TypeRef::Collection(element) => write!(f, "collection<{element}>"),
            TypeRef::Map(key, value) => write!(f, "map<{key}, {value}>"),
            TypeRef::Optional(wrapped) => write!(f, "optional<{wrapped}>"),
            TypeRef::Complex(name) => write!(f, "{name}"),
        }
    }
}

/// A single declared property of a type.
///
/// Identity is (owning type, name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Declared property name
    pub name: String,

    /// Declared type reference
    pub type_ref: TypeRef,

    /// Annotations attached directly to the property declaration
    pub annotations: Vec<AnnotationValue>,

    /// Static members never contribute to the schema
    pub is_static: bool,
}

impl PropertyDef {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            annotations: Vec::new(),
            is_static: false,
        }
    }

    pub fn with_annotation(mut self, annotation: AnnotationValue) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// The accessor kinds a property may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorKind {
    /// Boolean predicate accessor
    Predicate,

    /// Read accessor
    Getter,

    /// Write accessor
    Setter,
}

/// An accessor method associated with a property.
///
/// The type-discovery collaborator resolves which method accesses which
/// property; the generator never pattern-matches method names itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessorDef {
    /// Which accessor role this method plays
    pub kind: AccessorKind,

    /// Name of the property this method accesses
    pub property: String,

    /// Annotations attached to the method
    pub annotations: Vec<AnnotationValue>,
}

impl AccessorDef {
    pub fn new(kind: AccessorKind, property: impl Into<String>) -> Self {
        Self {
            kind,
            property: property.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: AnnotationValue) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A named constant of an enum type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumConstant {
    /// Declared constant name
    pub name: String,

    /// Annotations attached to the constant (rename, ignore)
    pub annotations: Vec<AnnotationValue>,
}

impl EnumConstant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: AnnotationValue) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Immutable description of one type in the graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDef {
    /// Fully-qualified type name
    pub fully_qualified_name: String,

    /// Declared properties, in declaration order
    pub properties: Vec<PropertyDef>,

    /// Accessor methods, already associated with their properties
    pub accessors: Vec<AccessorDef>,

    /// Annotations attached to the type itself
    pub annotations: Vec<AnnotationValue>,

    /// Whether this type is an enumeration
    pub is_enum: bool,

    /// Enum constants, empty for non-enum types
    pub enum_constants: Vec<EnumConstant>,

    /// Fully-qualified names of supertypes, nearest first
    pub supertypes: Vec<String>,
}

impl TypeDef {
    pub fn new(fully_qualified_name: impl Into<String>) -> Self {
        Self {
            fully_qualified_name: fully_qualified_name.into(),
            properties: Vec::new(),
            accessors: Vec::new(),
            annotations: Vec::new(),
            is_enum: false,
            enum_constants: Vec::new(),
            supertypes: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_accessor(mut self, accessor: AccessorDef) -> Self {
        self.accessors.push(accessor);
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationValue) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    pub fn enumeration(
        fully_qualified_name: impl Into<String>,
        constants: Vec<EnumConstant>,
    ) -> Self {
        Self {
            is_enum: true,
            enum_constants: constants,
            ..Self::new(fully_qualified_name)
        }
    }

    /// A reference to this type.
    pub fn to_reference(&self) -> TypeRef {
        TypeRef::Complex(self.fully_qualified_name.clone())
    }

    /// Accessors associated with the named property, in predicate, getter,
    /// setter order.
    pub fn accessors_for(&self, property: &str) -> Vec<&AccessorDef> {
        let mut found: Vec<&AccessorDef> = self
            .accessors
            .iter()
            .filter(|a| a.property == property)
            .collect();
        found.sort_by_key(|a| match a.kind {
            AccessorKind::Predicate => 0,
            AccessorKind::Getter => 1,
            AccessorKind::Setter => 2,
        });
        found
    }
}

/// Lookup interface into the resolved type graph.
///
/// Implemented by the type-discovery collaborator. A failed lookup is
/// surfaced to callers as-is; the generator does not retry.
pub trait TypeIndex: Send + Sync {
    fn definition(&self, fully_qualified_name: &str) -> Option<&TypeDef>;
}

/// Simple map-backed [`TypeIndex`].
#[derive(Debug, Default)]
pub struct InMemoryTypeIndex {
    types: HashMap<String, TypeDef>,
}

impl InMemoryTypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = TypeDef>) -> Self {
        let mut index = Self::new();
        for def in definitions {
            index.insert(def);
        }
        index
    }

    pub fn insert(&mut self, definition: TypeDef) {
        self.types
            .insert(definition.fully_qualified_name.clone(), definition);
    }
}

impl TypeIndex for InMemoryTypeIndex {
    fn definition(&self, fully_qualified_name: &str) -> Option<&TypeDef> {
        self.types.get(fully_qualified_name)
    }
}
