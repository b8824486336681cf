//! HTTP Peer Pool
//!
//! Owns the hash ring and one client per peer, and picks the peer that owns
//! a key.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::peers::{HashRing, HttpGetter, PeerGetter, PeerPicker};

/// Path prefix of the peer endpoint when none is configured
pub const DEFAULT_BASE_PATH: &str = "/_cache/";

/// Ring and clients for one peer list, always replaced as a whole.
#[derive(Debug)]
struct Topology {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// Peer picker backed by a consistent hash ring over HTTP peers.
///
/// Peers are identified by their base URL (e.g. `http://10.0.0.2:8001`);
/// `self_addr` must use the same spelling as this node's entry in the peer
/// list so keys it owns are served locally.
#[derive(Debug)]
pub struct HttpPool {
    self_addr: String,
    base_path: String,
    replicas: usize,
    client: reqwest::Client,
    topology: RwLock<Topology>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool with no peers; every key is served locally until
    /// [`HttpPool::set_peers`] is called.
    pub fn new(self_addr: impl Into<String>, base_path: &str, replicas: usize) -> Self {
        Self {
            self_addr: normalize_addr(&self_addr.into()),
            base_path: normalize_base_path(base_path),
            replicas,
            client: reqwest::Client::new(),
            topology: RwLock::new(Topology {
                ring: HashRing::new(replicas),
                getters: HashMap::new(),
            }),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    // == Set Peers ==
    /// Replaces the peer list, rebuilding the ring and the client table.
    ///
    /// The new topology is built before the swap, so concurrent pickers see
    /// either the old or the new peer set.
    pub async fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|peer| normalize_addr(peer.as_ref()))
            .filter(|peer| !peer.is_empty())
            .collect();

        let mut ring = HashRing::new(self.replicas);
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let getter = HttpGetter::new(
                    format!("{peer}{}", self.base_path),
                    self.client.clone(),
                );
                (peer.clone(), Arc::new(getter))
            })
            .collect();

        *self.topology.write().await = Topology { ring, getters };
        info!(node = %self.self_addr, peers = ?peers, "Peer set replaced");
    }

    /// Returns the currently configured peers, sorted.
    pub async fn peers(&self) -> Vec<String> {
        let topology = self.topology.read().await;
        let mut peers: Vec<String> = topology.getters.keys().cloned().collect();
        peers.sort();
        peers
    }
}

#[async_trait]
impl PeerPicker for HttpPool {
    async fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let topology = self.topology.read().await;
        let peer = topology.ring.get(key)?;
        if peer == self.self_addr {
            return None;
        }

        debug!(node = %self.self_addr, peer, key, "Picked peer");
        let getter = topology.getters.get(peer)?;
        Some(Arc::clone(getter) as Arc<dyn PeerGetter>)
    }
}

fn normalize_addr(addr: &str) -> String {
    addr.trim().trim_end_matches('/').to_string()
}

/// Ensures the base path starts and ends with `/`.
fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}/")
    }
}
