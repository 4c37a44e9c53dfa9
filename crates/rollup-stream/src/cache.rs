//! Caller-owned transform cache.
//!
//! A [`CacheHandle`] is created by the caller, passed into [`InputOptions`],
//! and threaded through the configuration snapshot into the backend's build
//! call. The stream core never reads or writes it; only backends do. Reuse
//! is identity-based: cloning a handle shares the underlying map, so two
//! invocations that should share cache state pass clones of one handle.
//!
//! Sequential reuse is the supported pattern. The interior lock makes
//! individual lookups and stores atomic, but nothing coordinates two
//! concurrently running pipelines over one handle; that interleaving is the
//! caller's responsibility.
//!
//! [`InputOptions`]: crate::InputOptions

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// A cached module: the content hash of its source and the transformed code
/// produced from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedModule {
    /// seahash of the module source the cached code was produced from.
    pub source_hash: u64,
    /// Transformed code.
    pub code: String,
}

/// Opaque, identity-shared cache handle.
///
/// `Clone` is cheap and shares state - the Rust rendering of "pass the same
/// object instance to both invocations".
#[derive(Debug, Clone, Default)]
pub struct CacheHandle {
    modules: Arc<RwLock<FxHashMap<String, CachedModule>>>,
}

impl CacheHandle {
    /// Create an empty cache handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached code for `id`, but only if it was produced from a
    /// source with the same content hash. A stale entry is a miss.
    pub fn lookup(&self, id: &str, source_hash: u64) -> Option<String> {
        let modules = self.modules.read();
        modules
            .get(id)
            .filter(|m| m.source_hash == source_hash)
            .map(|m| m.code.clone())
    }

    /// Store transformed code for `id`, replacing any previous entry.
    pub fn store(&self, id: impl Into<String>, source_hash: u64, code: impl Into<String>) {
        self.modules.write().insert(
            id.into(),
            CachedModule {
                source_hash,
                code: code.into(),
            },
        );
    }

    /// Number of cached modules.
    pub fn len(&self) -> usize {
        self.modules.read().len()
    }

    /// True if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.modules.read().is_empty()
    }

    /// True if `other` is a clone of this handle (shares the same state).
    pub fn shares_state_with(&self, other: &CacheHandle) -> bool {
        Arc::ptr_eq(&self.modules, &other.modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_requires_matching_hash() {
        let cache = CacheHandle::new();
        cache.store("./entry.js", 42, "transformed");

        assert_eq!(cache.lookup("./entry.js", 42).as_deref(), Some("transformed"));
        assert_eq!(cache.lookup("./entry.js", 43), None);
        assert_eq!(cache.lookup("./other.js", 42), None);
    }

    #[test]
    fn store_replaces_stale_entries() {
        let cache = CacheHandle::new();
        cache.store("./entry.js", 1, "old");
        cache.store("./entry.js", 2, "new");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("./entry.js", 1), None);
        assert_eq!(cache.lookup("./entry.js", 2).as_deref(), Some("new"));
    }

    #[test]
    fn clones_share_identity() {
        let cache = CacheHandle::new();
        let clone = cache.clone();
        clone.store("./entry.js", 7, "code");

        assert!(cache.shares_state_with(&clone));
        assert_eq!(cache.lookup("./entry.js", 7).as_deref(), Some("code"));

        let unrelated = CacheHandle::new();
        assert!(!cache.shares_state_with(&unrelated));
        assert!(unrelated.is_empty());
    }
}
