//! Peers Module
//!
//! Routing of keys to the node that owns them, and the HTTP client used to
//! fetch values from that node.

mod client;
mod pool;
mod ring;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpGetter;
pub use pool::{HttpPool, DEFAULT_BASE_PATH};
pub use ring::{HashFn, HashRing, DEFAULT_REPLICAS};

// == Peer Picker ==
/// Chooses the peer that owns a key.
#[async_trait]
pub trait PeerPicker: Send + Sync {
    /// Returns the owning remote peer, or `None` when the key belongs to
    /// this node or no peers are known.
    async fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Fetches a group's value for a key from one remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}
