//! Cache Statistics Module
//!
//! Tracks per-group counters: lookups, hits, loads by origin and evictions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Group Stats ==
/// Live counters for one group, updated concurrently without locking.
#[derive(Debug, Default)]
pub struct GroupStats {
    gets: AtomicU64,
    hits: AtomicU64,
    loads: AtomicU64,
    loads_deduped: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    local_loads: AtomicU64,
    local_load_errors: AtomicU64,
    evictions: AtomicU64,
}

impl GroupStats {
    // == Constructor ==
    /// Creates a GroupStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Get ==
    /// Counts a lookup with a non-empty key.
    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Hit ==
    /// Counts a lookup answered from the local shard.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Load ==
    /// Counts a miss entering the deduplicator.
    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Load Deduped ==
    /// Counts a miss that shared another caller's in-flight load.
    pub fn record_load_deduped(&self) {
        self.loads_deduped.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Peer Load ==
    /// Counts a value fetched from a remote peer.
    pub fn record_peer_load(&self) {
        self.peer_loads.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Peer Error ==
    /// Counts a failed remote fetch.
    pub fn record_peer_error(&self) {
        self.peer_errors.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Local Load ==
    /// Counts a value produced by the source loader.
    pub fn record_local_load(&self) {
        self.local_loads.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Local Load Error ==
    /// Counts a source loader failure.
    pub fn record_local_load_error(&self) {
        self.local_load_errors.fetch_add(1, Ordering::Relaxed);
    }

    // == Record Eviction ==
    /// Counts an entry evicted from the local shard.
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the counters together with the shard's current occupancy.
    pub fn snapshot(&self, entries: usize, bytes: usize) -> CacheStats {
        CacheStats {
            gets: self.gets.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            loads_deduped: self.loads_deduped.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            local_load_errors: self.local_load_errors.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries,
            bytes,
        }
    }
}

// == Cache Stats ==
/// Point-in-time copy of a group's statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// `Group::get` calls with a non-empty key
    pub gets: u64,
    /// Lookups answered from the local shard
    pub hits: u64,
    /// Misses handed to the deduplicator
    pub loads: u64,
    /// Misses that shared another caller's in-flight load
    pub loads_deduped: u64,
    /// Values fetched from a remote peer
    pub peer_loads: u64,
    /// Remote fetches that failed and fell back to the loader
    pub peer_errors: u64,
    /// Values produced by the local source loader
    pub local_loads: u64,
    /// Source loader failures
    pub local_load_errors: u64,
    /// Entries evicted from the local shard
    pub evictions: u64,
    /// Entries resident in the local shard
    pub entries: usize,
    /// Bytes accounted to resident entries
    pub bytes: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / gets, or 0.0 if no lookups have been made. Empty keys
    /// are rejected before counting, so they do not lower the rate.
    pub fn hit_rate(&self) -> f64 {
        if self.gets == 0 {
            0.0
        } else {
            self.hits as f64 / self.gets as f64
        }
    }
}
