//! Shard Module
//!
//! Mutex-guarded LRU cache owned by a single group.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{ByteView, EvictionCallback, GroupStats, LruCache};

// == Shard ==
/// Serializes access to one [`LruCache`].
///
/// The cache is only allocated on the first `put`, so groups that are only
/// ever served remotely never build eviction bookkeeping. The lock is held
/// for the in-memory operation alone.
#[derive(Debug)]
pub(crate) struct Shard {
    cache_bytes: usize,
    stats: Arc<GroupStats>,
    lru: Mutex<Option<LruCache<ByteView>>>,
}

impl Shard {
    // == Constructor ==
    pub(crate) fn new(cache_bytes: usize, stats: Arc<GroupStats>) -> Self {
        Self {
            cache_bytes,
            stats,
            lru: Mutex::new(None),
        }
    }

    // == Put ==
    pub(crate) async fn put(&self, key: &str, value: ByteView) {
        let mut guard = self.lru.lock().await;
        let lru = guard.get_or_insert_with(|| {
            let stats = Arc::clone(&self.stats);
            let on_evicted: EvictionCallback<ByteView> =
                Box::new(move |key: &str, value: &ByteView| {
                    debug!(key, bytes = value.len(), "Evicted cache entry");
                    stats.record_eviction();
                });
            LruCache::new(self.cache_bytes, Some(on_evicted))
        });
        lru.put(key, value);
    }

    // == Get ==
    pub(crate) async fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.lru.lock().await;
        guard.as_mut()?.get(key).cloned()
    }

    // == Occupancy ==
    /// Returns `(entries, bytes)` currently resident.
    pub(crate) async fn occupancy(&self) -> (usize, usize) {
        let guard = self.lru.lock().await;
        guard
            .as_ref()
            .map_or((0, 0), |lru| (lru.len(), lru.used_bytes()))
    }

    /// Checks residency without promoting the entry.
    pub(crate) async fn contains(&self, key: &str) -> bool {
        let guard = self.lru.lock().await;
        guard.as_ref().is_some_and(|lru| lru.contains(key))
    }
}
