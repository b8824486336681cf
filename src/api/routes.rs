//! API Routes
//!
//! Configures the Axum router serving peers and clients.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    api_handler, health_handler, peer_handler, set_peers_handler, stats_handler, AppState,
};

/// Creates the node's router.
///
/// # Endpoints
/// - `GET <base_path><group>/<key>` - Peer endpoint (router fallback)
/// - `GET /api/:group/:key` - Look a key up through its group
/// - `PUT /peers` - Replace the peer list
/// - `GET /stats` - Per-group statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/:group/:key", get(api_handler))
        .route("/peers", put(set_peers_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback(peer_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
