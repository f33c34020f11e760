//! Schema resolution engine
//!
//! Turns a resolved type graph into the structural (OpenAPI v3) schema
//! embeddable in a CustomResourceDefinition: annotation extraction, property
//! resolution, scoped schema swaps, recursive schema building and platform
//! type classification.

pub mod annotations;
pub mod builder;
pub mod error;
pub mod facade;
pub mod node;
pub mod platform;
pub mod resolver;
pub mod swaps;

pub use builder::{SchemaBuilder, SchemaPropsOptions, StructuralBuilder};
pub use error::SchemaError;
pub use facade::{resolve_property, PathMarker, PrinterColumnRequest, ResolvedProperty};
pub use node::{ObjectSchema, ScalarKind, SchemaKind, SchemaMetadata, SchemaNode};
pub use platform::{IntrospectedType, NoIntrospection, PlatformTypeCache, RuntimeIntrospector};
pub use resolver::{ResolvingContext, SchemaResolver};
pub use swaps::{SchemaSwaps, SwapResult};
