//! Web API module for smplbin.
//!
//! This module exposes the bin lifecycle as a JSON REST API under
//! `/api/v1`, plus a landing route, a health check and the API docs.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
