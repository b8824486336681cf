//! Request DTOs for the peer cache API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for peer reconfiguration (PUT /peers)
///
/// # Fields
/// - `peers`: Base URLs of every node in the cluster, this one included
#[derive(Debug, Clone, Deserialize)]
pub struct SetPeersRequest {
    pub peers: Vec<String>,
}

impl SetPeersRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.peers.is_empty() {
            return Some("Peer list cannot be empty".to_string());
        }
        for peer in &self.peers {
            if !(peer.starts_with("http://") || peer.starts_with("https://")) {
                return Some(format!("Peer '{peer}' is not an http(s) base URL"));
            }
        }
        None
    }
}
