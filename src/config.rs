//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;

use crate::peers::{DEFAULT_BASE_PATH, DEFAULT_REPLICAS};

const DEFAULT_PORT: u16 = 8001;
const DEFAULT_CACHE_BYTES: usize = 64 << 20;
const DEFAULT_GROUP_NAME: &str = "scores";

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// This node's base URL as it appears in `peers`
    pub self_addr: String,
    /// Base URLs of every node in the cluster, this one included
    pub peers: Vec<String>,
    /// Path prefix of the peer endpoint
    pub base_path: String,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Byte budget of the group's local cache (0 = unlimited)
    pub cache_bytes: usize,
    /// Name of the group served by this node
    pub group_name: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `SELF_ADDR` - This node's base URL (default: `http://localhost:<port>`)
    /// - `PEERS` - Comma-separated peer base URLs (default: just `SELF_ADDR`)
    /// - `BASE_PATH` - Peer endpoint prefix (default: `/_cache/`)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `CACHE_BYTES` - Local cache byte budget (default: 64 MiB)
    /// - `GROUP_NAME` - Group served by this node (default: `scores`)
    pub fn from_env() -> Self {
        let server_port = parse_var("SERVER_PORT").unwrap_or(DEFAULT_PORT);
        let self_addr =
            env::var("SELF_ADDR").unwrap_or_else(|_| format!("http://localhost:{server_port}"));
        let peers = env::var("PEERS")
            .ok()
            .map(|v| parse_peers(&v))
            .filter(|peers| !peers.is_empty())
            .unwrap_or_else(|| vec![self_addr.clone()]);

        Self {
            server_port,
            self_addr,
            peers,
            base_path: env::var("BASE_PATH").unwrap_or_else(|_| DEFAULT_BASE_PATH.to_string()),
            replicas: parse_var("REPLICAS").unwrap_or(DEFAULT_REPLICAS),
            cache_bytes: parse_var("CACHE_BYTES").unwrap_or(DEFAULT_CACHE_BYTES),
            group_name: env::var("GROUP_NAME").unwrap_or_else(|_| DEFAULT_GROUP_NAME.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let self_addr = format!("http://localhost:{DEFAULT_PORT}");
        Self {
            server_port: DEFAULT_PORT,
            peers: vec![self_addr.clone()],
            self_addr,
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas: DEFAULT_REPLICAS,
            cache_bytes: DEFAULT_CACHE_BYTES,
            group_name: DEFAULT_GROUP_NAME.to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Splits a comma-separated peer list, dropping blanks.
fn parse_peers(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|peer| !peer.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.self_addr, "http://localhost:8001");
        assert_eq!(config.peers, vec!["http://localhost:8001".to_string()]);
        assert_eq!(config.base_path, "/_cache/");
        assert_eq!(config.replicas, 50);
        assert_eq!(config.cache_bytes, 64 * 1024 * 1024);
        assert_eq!(config.group_name, "scores");
    }

    #[test]
    fn test_parse_peers() {
        assert_eq!(
            parse_peers(" http://a:8001, ,http://b:8002 ,"),
            vec!["http://a:8001".to_string(), "http://b:8002".to_string()]
        );
        assert!(parse_peers("").is_empty());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "SERVER_PORT",
            "SELF_ADDR",
            "PEERS",
            "BASE_PATH",
            "REPLICAS",
            "CACHE_BYTES",
            "GROUP_NAME",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        let defaults = Config::default();
        assert_eq!(config.server_port, defaults.server_port);
        assert_eq!(config.self_addr, defaults.self_addr);
        assert_eq!(config.peers, defaults.peers);
        assert_eq!(config.replicas, defaults.replicas);
        assert_eq!(config.cache_bytes, defaults.cache_bytes);
    }
}
