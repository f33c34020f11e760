//! Error types for schema resolution

/// Errors raised while resolving a type graph into a structural schema.
///
/// All variants are fatal for the definition being generated; sibling
/// definitions are unaffected (failure isolation happens in the orchestrator).
#[derive(thiserror::Error, Debug)]
pub enum SchemaError {
    /// A cycle in the nested-property graph that no schema swap breaks.
    /// The chain lists every hop from the root to the repeated type.
    #[error("found a cyclic reference: {chain}")]
    CyclicReference { chain: String },

    /// A schema swap was declared but never applied while resolving the
    /// annotated type's subtree.
    #[error("unmatched schema swaps: {swaps}")]
    UnmatchedSwaps { swaps: String },

    /// An unsupported type was passed to a schema substitution annotation.
    #[error("unmanaged type '{type_ref}' passed to a schema substitution annotation")]
    UnmanagedType { type_ref: String },

    /// The type-discovery collaborator could not describe a referenced type.
    /// Surfaced as-is, never retried.
    #[error("type '{name}' is not present in the supplied type graph")]
    UnknownType { name: String },
}
