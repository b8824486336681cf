//! HTTP Peer Client
//!
//! Fetches values from a remote node's peer endpoint.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::models::PeerResponse;
use crate::peers::PeerGetter;

// == HTTP Getter ==
/// Client for one remote peer.
///
/// `base_url` already includes the peer's base path, e.g.
/// `http://10.0.0.2:8001/_cache/`.
#[derive(Debug, Clone)]
pub struct HttpGetter {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGetter {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Builds `<base_url><group>/<key>` with both segments percent-encoded.
    pub fn url_for(&self, group: &str, key: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl PeerGetter for HttpGetter {
    async fn fetch(&self, group: &str, key: &str) -> Result<Vec<u8>> {
        let url = self.url_for(group, key);
        debug!(%url, "Fetching from peer");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CacheError::Transport(format!("requesting {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Transport(format!("server returned: {status}")));
        }

        let envelope: PeerResponse = response
            .json()
            .await
            .map_err(|e| CacheError::Transport(format!("decoding response body: {e}")))?;

        envelope.decode()
    }
}
