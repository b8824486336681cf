//! Error types for the peer cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for groups, peers and the peer server.
///
/// Cloneable so a single load result can be handed to every caller that
/// coalesced on the same key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Empty key passed to a group lookup
    #[error("key is required")]
    EmptyKey,

    /// The source loader failed to produce a value
    #[error("loader failed: {0}")]
    Loader(String),

    /// A remote peer fetch could not complete
    #[error("peer transport failed: {0}")]
    Transport(String),

    /// No group registered under the requested name
    #[error("no such group: {0}")]
    UnknownGroup(String),

    /// Peer request path did not match `<base>/<group>/<key>`
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// A peer picker was already registered on the group
    #[error("peer picker already registered for group {0}")]
    PeersAlreadyRegistered(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey | CacheError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::UnknownGroup(_) => StatusCode::NOT_FOUND,
            CacheError::Transport(_) => StatusCode::BAD_GATEWAY,
            CacheError::Loader(_)
            | CacheError::PeersAlreadyRegistered(_)
            | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for CacheError {
    fn from(err: anyhow::Error) -> Self {
        CacheError::Loader(format!("{err:#}"))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the peer cache.
pub type Result<T> = std::result::Result<T, CacheError>;
