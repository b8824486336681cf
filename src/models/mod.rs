//! Request and Response models for the peer cache API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies, including
//! the envelope exchanged between peers.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::SetPeersRequest;
pub use responses::{
    GroupStatsResponse, HealthResponse, PeerResponse, SetPeersResponse, StatsResponse,
};
