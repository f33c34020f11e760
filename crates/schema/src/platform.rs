//! Platform type classification
//!
//! Types living in the host runtime's standard library are not part of the
//! supplied type graph. They are classified once per run through the
//! collaborator-supplied introspector and the result is memoized, negative
//! answers included, so repeated introspection cost is paid at most once per
//! type name.

use crate::node::ScalarKind;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// Outcome of introspecting a platform type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrospectedType {
    /// Serializes as a single scalar value
    Scalar(ScalarKind),

    /// Serializes as an array of one scalar kind
    ScalarArray(ScalarKind),
}

/// Classifies platform types by inspecting how the host runtime serializes
/// them. Supplied by the type-discovery collaborator.
pub trait RuntimeIntrospector: Send + Sync {
    fn classify(&self, fully_qualified_name: &str) -> Option<IntrospectedType>;
}

impl<F> RuntimeIntrospector for F
where
    F: Fn(&str) -> Option<IntrospectedType> + Send + Sync,
{
    fn classify(&self, fully_qualified_name: &str) -> Option<IntrospectedType> {
        self(fully_qualified_name)
    }
}

/// Introspector that never classifies anything; platform types fall through
/// to regular complex-type resolution.
#[derive(Debug, Default)]
pub struct NoIntrospection;

impl RuntimeIntrospector for NoIntrospection {
    fn classify(&self, _fully_qualified_name: &str) -> Option<IntrospectedType> {
        None
    }
}

/// Run-scoped memoizing cache in front of a [`RuntimeIntrospector`].
///
/// Safe for concurrent population from parallel generation tasks: duplicate
/// computation of the same key is acceptable, the last identical write wins.
pub struct PlatformTypeCache {
    namespaces: Vec<String>,
    introspector: Box<dyn RuntimeIntrospector>,
    classified: RwLock<HashMap<String, Option<IntrospectedType>>>,
}

impl Default for PlatformTypeCache {
    fn default() -> Self {
        Self::new(Box::new(NoIntrospection))
    }
}

impl PlatformTypeCache {
    /// Cache over the default platform namespaces of the host runtime.
    pub fn new(introspector: Box<dyn RuntimeIntrospector>) -> Self {
        Self::with_namespaces(introspector, vec!["java.".to_string(), "javax.".to_string()])
    }

    /// Cache restricted to the given namespace prefixes.
    pub fn with_namespaces(
        introspector: Box<dyn RuntimeIntrospector>,
        namespaces: Vec<String>,
    ) -> Self {
        Self {
            namespaces,
            introspector,
            classified: RwLock::new(HashMap::new()),
        }
    }

    /// Classifies a type name, consulting the introspector at most once per
    /// name for the lifetime of this cache.
    pub fn classify(&self, fully_qualified_name: &str) -> Option<IntrospectedType> {
        if !self
            .namespaces
            .iter()
            .any(|ns| fully_qualified_name.starts_with(ns.as_str()))
        {
            return None;
        }

        if let Some(cached) = self
            .classified
            .read()
            .expect("platform cache poisoned")
            .get(fully_qualified_name)
        {
            return *cached;
        }

        let result = self.introspector.classify(fully_qualified_name);
        if result.is_none() {
            debug!(
                "No scalar schema could be introspected for {}, resolving as a complex type",
                fully_qualified_name
            );
        }
        self.classified
            .write()
            .expect("platform cache poisoned")
            .insert(fully_qualified_name.to_string(), result);
        result
    }
}

impl std::fmt::Debug for PlatformTypeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformTypeCache")
            .field("namespaces", &self.namespaces)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_classification_is_cached_including_negatives() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cache = PlatformTypeCache::new(Box::new(move |name: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            match name {
                "java.time.Instant" => Some(IntrospectedType::Scalar(ScalarKind::String)),
                _ => None,
            }
        }));

        assert_eq!(
            cache.classify("java.time.Instant"),
            Some(IntrospectedType::Scalar(ScalarKind::String))
        );
        assert_eq!(cache.classify("java.time.Instant"), Some(IntrospectedType::Scalar(ScalarKind::String)));
        assert_eq!(cache.classify("java.util.Properties"), None);
        assert_eq!(cache.classify("java.util.Properties"), None);

        // one introspection per distinct name
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_non_platform_namespaces_are_not_introspected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let cache = PlatformTypeCache::new(Box::new(move |_: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            None
        }));

        assert_eq!(cache.classify("com.example.WidgetSpec"), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
