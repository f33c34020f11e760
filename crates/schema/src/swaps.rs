//! Scoped, depth-bounded type substitution
//!
//! A swap scope is opened when a schema-swap annotation is found on a type and
//! stays usable while that type's subtree is resolved. Scope sets branch when
//! the resolver enters a new type's property loop (`branch_annotations`) and
//! when it descends into a single property (`branch_depths`, which counts the
//! remaining depth down). A scope that closes without ever matching is a
//! configuration error.

use crate::error::SchemaError;
use crdgen_model::{SchemaSwapSpec, TypeRef};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// One open swap scope. Clones share the matched flag so that a match found
/// in a child branch is visible to the frame that opened the scope.
#[derive(Debug, Clone)]
struct SwapScope {
    owner: TypeRef,
    original: String,
    field_name: String,
    target: TypeRef,
    /// Remaining recursion levels; `None` is unbounded within the branch
    remaining: Option<u32>,
    matched: Arc<AtomicBool>,
}

impl SwapScope {
    fn describe(&self) -> String {
        format!(
            "SchemaSwap(originalType={}, fieldName={}, targetType={}) on {}",
            self.original, self.field_name, self.target, self.owner
        )
    }
}

/// Result of a swap lookup for one property.
#[derive(Debug, Clone, Default)]
pub struct SwapResult {
    /// Replacement type when a scope matched
    pub target: Option<TypeRef>,

    /// Whether a swap applies to this property; the resolver restarts cycle
    /// detection below a swapped property
    pub matched: bool,
}

/// The set of swap scopes active at one point of the recursive descent.
#[derive(Debug, Default)]
pub struct SchemaSwaps {
    scopes: HashMap<(String, String), SwapScope>,
    /// Scopes registered at this level; checked on frame exit
    own: Vec<SwapScope>,
}

impl SchemaSwaps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a scope for a swap declared on `owner`.
    ///
    /// The original type must be a named complex type; anything else cannot
    /// own a swappable property.
    pub fn register(&mut self, owner: TypeRef, spec: &SchemaSwapSpec) -> Result<(), SchemaError> {
        let Some(original) = spec.original_type.fully_qualified_name() else {
            return Err(SchemaError::UnmanagedType {
                type_ref: spec.original_type.to_string(),
            });
        };

        let scope = SwapScope {
            owner,
            original: original.to_string(),
            field_name: spec.field_name.clone(),
            target: spec.target_type.clone(),
            remaining: spec.depth,
            matched: Arc::new(AtomicBool::new(false)),
        };
        let key = (scope.original.clone(), scope.field_name.clone());
        if let Some(replaced) = self.scopes.insert(key, scope.clone()) {
            debug!(
                "Swap {} shadows {} for the current subtree",
                scope.describe(),
                replaced.describe()
            );
        }
        self.own.push(scope);
        Ok(())
    }

    /// Child scope set for entering a new type's property loop. Inherits the
    /// parent's open scopes; registrations on the child are checked at that
    /// child's frame exit.
    pub fn branch_annotations(&self) -> Self {
        Self {
            scopes: self.scopes.clone(),
            own: Vec::new(),
        }
    }

    /// Child scope set for descending into a single property. Every open
    /// scope's remaining depth is counted down; exhausted scopes close.
    pub fn branch_depths(&self) -> Self {
        let scopes = self
            .scopes
            .iter()
            .filter_map(|(key, scope)| match scope.remaining {
                None => Some((key.clone(), scope.clone())),
                Some(0) => None,
                Some(depth) => {
                    let mut scope = scope.clone();
                    scope.remaining = Some(depth - 1);
                    Some((key.clone(), scope))
                }
            })
            .collect();
        Self {
            scopes,
            own: Vec::new(),
        }
    }

    /// Looks up an override for the property `field_name` of `type_ref` and
    /// marks the scope matched when one applies.
    pub fn lookup_and_mark(&self, type_ref: &TypeRef, field_name: &str) -> SwapResult {
        let Some(fully_qualified_name) = type_ref.fully_qualified_name() else {
            return SwapResult::default();
        };
        let key = (fully_qualified_name.to_string(), field_name.to_string());
        match self.scopes.get(&key) {
            Some(scope) => {
                scope.matched.store(true, Ordering::Relaxed);
                debug!(
                    "Swapping {}.{} to {}",
                    fully_qualified_name, field_name, scope.target
                );
                SwapResult {
                    target: Some(scope.target.clone()),
                    matched: true,
                }
            }
            None => SwapResult::default(),
        }
    }

    /// Fails when a scope registered at this level never matched: the
    /// annotation names a property that does not exist or was never resolved.
    pub fn ensure_all_matched(&self) -> Result<(), SchemaError> {
        let unmatched: Vec<String> = self
            .own
            .iter()
            .filter(|scope| !scope.matched.load(Ordering::Relaxed))
            .map(SwapScope::describe)
            .collect();
        if unmatched.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::UnmatchedSwaps {
                swaps: unmatched.join(", "),
            })
        }
    }
}
