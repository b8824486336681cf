//! Group Module
//!
//! A named cache namespace: local shard, peer routing, request coalescing
//! and the source loader, tied together by the lookup path.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::cache::{ByteView, CacheStats, GroupStats, Shard};
use crate::error::{CacheError, Result};
use crate::group::{Flight, Getter};
use crate::peers::{PeerGetter, PeerPicker};

// == Group ==
/// A cache namespace.
///
/// Lookup order for a key:
/// 1. the local shard;
/// 2. on a miss, the owning peer chosen by the registered [`PeerPicker`]
///    (values fetched remotely are not cached here);
/// 3. if no remote peer owns the key or the fetch fails, the [`Getter`],
///    whose result is stored in the local shard.
///
/// Concurrent misses on the same key share a single pass through 2 and 3.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: Shard,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: Flight<Result<ByteView>>,
    stats: Arc<GroupStats>,
}

impl Group {
    // == Constructor ==
    pub(crate) fn new(name: impl Into<String>, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        let stats = Arc::new(GroupStats::new());
        Self {
            name: name.into(),
            getter,
            main_cache: Shard::new(cache_bytes, Arc::clone(&stats)),
            peers: OnceLock::new(),
            loader: Flight::new(),
            stats,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Installs the peer picker. Allowed once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers
            .set(peers)
            .map_err(|_| CacheError::PeersAlreadyRegistered(self.name.clone()))
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a miss.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        self.stats.record_get();

        if let Some(value) = self.main_cache.get(key).await {
            self.stats.record_hit();
            debug!(group = %self.name, key, "Cache hit");
            return Ok(value);
        }

        self.load(key).await
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        let (entries, bytes) = self.main_cache.occupancy().await;
        self.stats.snapshot(entries, bytes)
    }

    /// Checks whether `key` is resident in the local shard.
    pub async fn is_cached(&self, key: &str) -> bool {
        self.main_cache.contains(key).await
    }

    /// Resolves a miss, sharing the result with concurrent misses on `key`.
    async fn load(&self, key: &str) -> Result<ByteView> {
        self.stats.record_load();

        let mut ran = false;
        let result = self
            .loader
            .run(key, || {
                ran = true;
                self.load_once(key)
            })
            .await;

        if !ran {
            self.stats.record_load_deduped();
            debug!(group = %self.name, key, "Shared in-flight load");
        }
        result
    }

    async fn load_once(&self, key: &str) -> Result<ByteView> {
        if let Some(peers) = self.peers.get() {
            if let Some(peer) = peers.pick_peer(key).await {
                match self.get_from_peer(peer.as_ref(), key).await {
                    Ok(value) => {
                        self.stats.record_peer_load();
                        return Ok(value);
                    }
                    Err(err) => {
                        self.stats.record_peer_error();
                        warn!(group = %self.name, key, error = %err, "Failed to get from peer");
                    }
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.fetch(&self.name, key).await?;
        Ok(ByteView::from(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        match self.getter.get(key).await {
            Ok(bytes) => {
                let value = ByteView::from(bytes);
                self.populate_cache(key, value.clone()).await;
                self.stats.record_local_load();
                info!(group = %self.name, key, bytes = value.len(), "Loaded from source");
                Ok(value)
            }
            Err(err) => {
                self.stats.record_local_load_error();
                Err(CacheError::from(err))
            }
        }
    }

    async fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.put(key, value).await;
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("name", &self.name)
            .field("main_cache", &self.main_cache)
            .field("has_peers", &self.peers.get().is_some())
            .finish()
    }
}
