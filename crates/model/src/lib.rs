//! Type graph model consumed by the CRD schema generator
//!
//! The structures in this crate are supplied by an external type-discovery
//! collaborator (classpath scanner, annotation processor, ...). The generator
//! core only reads them.

pub mod annotations;
pub mod resource;
pub mod types;

pub use annotations::{
    AnnotationValue, FormatShape, PrinterColumnSpec, SchemaSwapSpec, ValidationRuleSpec,
};
pub use resource::{CustomResourceInfo, Scope};
pub use types::{
    AccessorDef, AccessorKind, EnumConstant, InMemoryTypeIndex, PropertyDef, TypeDef, TypeIndex,
    TypeRef,
};
