//! Health check endpoints

use axum::{response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness text returned by `/healthcheck`
pub const HEALTHCHECK_MESSAGE: &str = "Email Service is running.";

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Plain-text liveness probe
#[utoipa::path(
    get,
    path = "/healthcheck",
    tag = "System",
    responses(
        (status = 200, description = "Service is running", body = String)
    )
)]
pub async fn healthcheck() -> &'static str {
    HEALTHCHECK_MESSAGE
}
