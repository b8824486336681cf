//! Cache Module
//!
//! Provides the node-local storage: immutable byte views, a byte-budgeted
//! LRU cache and the mutex-guarded shard a group reads and populates.

mod byte_view;
mod lru;
mod shard;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use byte_view::ByteView;
pub use lru::{EvictionCallback, LruCache, Value};
pub(crate) use shard::Shard;
pub use stats::{CacheStats, GroupStats};
