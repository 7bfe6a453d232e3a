//! Health check endpoint for container orchestration.
//!
//! A liveness probe: it only proves the process can answer HTTP. Kubernetes,
//! systemd and load balancers poll it to decide whether the service is alive.

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::config::{SERVICE_NAME, STATUS_OK};
use crate::error::AppError;

/// Liveness payload, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

impl HealthStatus {
    pub fn ok() -> Self {
        Self {
            status: STATUS_OK,
            service: SERVICE_NAME,
        }
    }
}

/// Health check handler.
pub async fn health() -> Result<Response, AppError> {
    json_response(&HealthStatus::ok())
}

/// Serialize `value` into a 200 JSON response.
///
/// Encoding happens before any byte is written, so a failure turns into a
/// 500 instead of a truncated body.
pub fn json_response<T: Serialize>(value: &T) -> Result<Response, AppError> {
    let body = serde_json::to_vec(value)?;
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response())
}
