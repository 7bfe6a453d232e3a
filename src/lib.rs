//! Tracker service.
//!
//! An HTTP process exposing a single liveness endpoint, `GET /health`, for
//! orchestrators and monitors.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;

pub use error::AppError;
pub use routes::create_router;
