//! Response DTOs for the peer cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;
use crate::error::{CacheError, Result};

/// Envelope returned by the peer endpoint
///
/// Carries only the value bytes, base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerResponse {
    pub value: String,
}

impl PeerResponse {
    /// Creates a new PeerResponse wrapping `bytes`
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            value: STANDARD.encode(bytes),
        }
    }

    /// Decodes the carried bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.value)
            .map_err(|e| CacheError::Transport(format!("decoding response body: {e}")))
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Statistics keyed by group name
    pub groups: BTreeMap<String, GroupStatsResponse>,
}

/// Statistics of one group
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hit rate (hits / gets)
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from per-group statistics
    pub fn new(stats: impl IntoIterator<Item = (String, CacheStats)>) -> Self {
        let groups = stats
            .into_iter()
            .map(|(name, stats)| {
                let hit_rate = stats.hit_rate();
                (name, GroupStatsResponse { stats, hit_rate })
            })
            .collect();
        Self { groups }
    }
}

/// Response body for the peer reconfiguration endpoint (PUT /peers)
#[derive(Debug, Clone, Serialize)]
pub struct SetPeersResponse {
    /// Success message
    pub message: String,
    /// Peers now in the ring
    pub peers: Vec<String>,
}

impl SetPeersResponse {
    pub fn new(peers: Vec<String>) -> Self {
        Self {
            message: format!("{} peers configured", peers.len()),
            peers,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Registered group names
    pub groups: Vec<String>,
    /// Configured peers, empty when running single-node
    pub peers: Vec<String>,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(groups: Vec<String>, peers: Vec<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            groups,
            peers,
        }
    }
}
