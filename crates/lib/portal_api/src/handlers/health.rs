//! Health endpoint.

use axum::Json;
use portal_core::models::api::HealthResponse;

/// `GET /api/health`: service name and version.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: portal_core::version().to_string(),
    })
}
