//! API Handlers
//!
//! HTTP request handlers for the peer endpoint and the node's client API.

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, warn};

use crate::error::{CacheError, Result};
use crate::group::GroupRegistry;
use crate::models::{
    HealthResponse, PeerResponse, SetPeersRequest, SetPeersResponse, StatsResponse,
};
use crate::peers::{HttpPool, DEFAULT_BASE_PATH};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Groups served by this node
    pub registry: Arc<GroupRegistry>,
    /// Peer pool, absent when the node runs on its own
    pub pool: Option<Arc<HttpPool>>,
    /// Prefix of the peer endpoint, starting and ending with `/`
    pub base_path: String,
}

impl AppState {
    /// Creates a single-node AppState serving the peer endpoint under the
    /// default base path.
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self {
            registry,
            pool: None,
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }

    /// Attaches a peer pool; the peer endpoint follows the pool's base path.
    pub fn with_pool(mut self, pool: Arc<HttpPool>) -> Self {
        self.base_path = pool.base_path().to_string();
        self.pool = Some(pool);
        self
    }
}

/// Fallback handler serving `<base_path><group>/<key>` to other peers.
///
/// Paths outside the base path, or without exactly a non-empty group and
/// key, are rejected as malformed.
pub async fn peer_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
) -> Result<Json<PeerResponse>> {
    let path = uri.path();
    info!(%method, path, "Peer request");

    let (group_name, key) = parse_peer_path(&state.base_path, path).inspect_err(|err| {
        warn!(path, error = %err, "Rejected peer request");
    })?;

    let group = state
        .registry
        .get_group(&group_name)
        .await
        .ok_or_else(|| CacheError::UnknownGroup(group_name.clone()))?;

    let view = group.get(&key).await?;
    Ok(Json(PeerResponse::new(&view.byte_slice())))
}

/// Splits a raw request path into decoded `(group, key)`.
pub fn parse_peer_path(base_path: &str, path: &str) -> Result<(String, String)> {
    let rest = path
        .strip_prefix(base_path)
        .ok_or_else(|| CacheError::MalformedRequest(format!("unexpected path: {path}")))?;

    let (group, key) = rest
        .split_once('/')
        .filter(|(group, key)| !group.is_empty() && !key.is_empty())
        .ok_or_else(|| {
            CacheError::MalformedRequest(format!("expected {base_path}<group>/<key>, got {path}"))
        })?;

    let decode = |segment: &str| {
        urlencoding::decode(segment)
            .map(Cow::into_owned)
            .map_err(|e| CacheError::MalformedRequest(format!("bad escape in {path}: {e}")))
    };

    Ok((decode(group)?, decode(key)?))
}

/// Handler for GET /api/:group/:key
///
/// Looks the key up through the group and returns the raw value bytes.
pub async fn api_handler(
    State(state): State<AppState>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<Response> {
    let group = state
        .registry
        .get_group(&group_name)
        .await
        .ok_or_else(|| CacheError::UnknownGroup(group_name.clone()))?;

    let view = group.get(&key).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        view.byte_slice(),
    )
        .into_response())
}

/// Handler for PUT /peers
///
/// Replaces the peer list of this node's pool.
pub async fn set_peers_handler(
    State(state): State<AppState>,
    Json(req): Json<SetPeersRequest>,
) -> Result<Json<SetPeersResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::MalformedRequest(error_msg));
    }

    let pool = state
        .pool
        .as_ref()
        .ok_or_else(|| CacheError::Internal("node has no peer pool".to_string()))?;

    pool.set_peers(&req.peers).await;
    Ok(Json(SetPeersResponse::new(pool.peers().await)))
}

/// Handler for GET /stats
///
/// Returns the statistics of every group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(state.registry.stats().await))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let peers = match &state.pool {
        Some(pool) => pool.peers().await,
        None => Vec::new(),
    };
    Json(HealthResponse::healthy(state.registry.names().await, peers))
}
