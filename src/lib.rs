//! Peer Cache - A distributed in-process cache
//!
//! Byte-budgeted LRU groups, consistent-hash routing of keys to the peer
//! that owns them, and per-key coalescing of concurrent misses.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFunc, Group, GroupRegistry};
pub use peers::{HttpPool, PeerGetter, PeerPicker};
