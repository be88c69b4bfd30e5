//! # authgate-api
//!
//! HTTP API layer for AuthGate built on Axum.
//!
//! Provides the auth endpoints, the bearer-token middleware, extractors,
//! DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
