//! HTTP route table.
//!
//! Only `GET /health` is served. Every other path, and every other method on
//! `/health`, answers 404: the liveness route is registered for GET alone and
//! a wrong method is reported the same way as an unknown path.

pub mod health;

use axum::{middleware, routing::get, Router};
use axum::http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::error::AppError;
use crate::middleware::request_id_layer;

/// Creates the Axum router with the liveness route and 404 fallbacks.
pub fn create_router() -> Router {
    let health_routes =
        Router::new().route("/health", get(health::health).fallback(not_found));

    Router::new()
        .merge(health_routes)
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

async fn not_found() -> AppError {
    AppError::NotFound
}
