//! API Module
//!
//! HTTP handlers and routing for the node: the peer endpoint other nodes
//! fetch from, plus a small client and operator API.
//!
//! # Endpoints
//! - `GET <base_path><group>/<key>` - Peer endpoint
//! - `GET /api/:group/:key` - Look a key up through its group
//! - `PUT /peers` - Replace the peer list
//! - `GET /stats` - Per-group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
