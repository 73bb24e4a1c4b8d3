//! Memoized resolution keyed by normalized path
//!
//! The cache wraps a resolver and stores each path's effective options the
//! first time it is resolved. Invalidation is wholesale: replacing the
//! resolver through `reload` drops every entry, since a single rule change
//! can affect any path.
//!
//! ## Concurrency
//!
//! Lookups take a shared lock. A miss computes outside the lock and then
//! stores under the write lock, overwriting any entry a racing thread stored
//! for the same path. Each reload bumps a generation counter; a result
//! computed against a resolver that was replaced mid-computation is returned
//! to its caller but not stored.
//!
//! The cache has no capacity bound. It holds one entry per distinct
//! normalized path resolved since the last `reload` or `clear`; hosts that
//! resolve an unbounded stream of paths should `clear` periodically.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::options::FormatOptions;
use crate::pattern::normalize_path;
use crate::resolver::ConfigResolver;

#[derive(Debug)]
struct CacheState {
    resolver: Arc<ConfigResolver>,
    generation: u64,
    /// Unbounded; one entry per distinct normalized path
    entries: HashMap<String, Arc<FormatOptions>>,
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to resolve
    pub misses: u64,
    /// Entries currently stored
    pub entries: usize,
}

/// Thread-safe memoizing wrapper around a `ConfigResolver`
#[derive(Debug)]
pub struct ResolutionCache {
    state: RwLock<CacheState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    pub fn new(resolver: ConfigResolver) -> Self {
        Self {
            state: RwLock::new(CacheState {
                resolver: Arc::new(resolver),
                generation: 0,
                entries: HashMap::new(),
            }),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    // Entries are plain values, so a panic in another holder cannot leave
    // them half-written.
    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Effective options for `path`, computed at most once per resolver
    pub fn resolve(&self, path: &str) -> Arc<FormatOptions> {
        let key = normalize_path(path);

        let (resolver, generation) = {
            let state = self.read();
            if let Some(hit) = state.entries.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(path = %key, "resolution cache hit");
                return Arc::clone(hit);
            }
            (Arc::clone(&state.resolver), state.generation)
        };

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(path = %key, "resolution cache miss");

        let resolved = Arc::new(resolver.resolve_normalized(&key));
        self.store(key, generation, Arc::clone(&resolved));
        resolved
    }

    // Last write wins. Results computed under an older generation are dropped.
    fn store(&self, key: String, generation: u64, value: Arc<FormatOptions>) {
        let mut state = self.write();
        if state.generation == generation {
            state.entries.insert(key, value);
        } else {
            tracing::trace!(path = %key, generation, "discarding stale resolution");
        }
    }

    #[cfg(test)]
    fn generation(&self) -> u64 {
        self.read().generation
    }

    /// Replace the resolver.
    ///
    /// Drops every entry unless the new resolver has the same fingerprint as
    /// the current one. Returns whether entries were dropped.
    pub fn reload(&self, resolver: ConfigResolver) -> bool {
        let mut state = self.write();
        if state.resolver.fingerprint() == resolver.fingerprint() {
            tracing::debug!("reload with identical resolver; keeping cache");
            return false;
        }

        let dropped = state.entries.len();
        state.resolver = Arc::new(resolver);
        state.generation += 1;
        state.entries.clear();

        tracing::info!(
            dropped,
            generation = state.generation,
            "resolution cache invalidated"
        );
        true
    }

    /// Drop every entry, keeping the current resolver
    pub fn clear(&self) {
        self.write().entries.clear();
    }

    /// The resolver currently in use
    pub fn resolver(&self) -> Arc<ConfigResolver> {
        Arc::clone(&self.read().resolver)
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
