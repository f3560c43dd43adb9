//! System endpoints: health check.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::BlogError;
use crate::persistence::EntryStore;
use crate::web::middleware::RequestConnection;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    entries: i64,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
///
/// # Errors
///
/// Returns [`BlogError::Store`] if the entry table cannot be read.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health, the number of stored entries, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Entry store unavailable"),
    )
)]
pub async fn health_handler(db: RequestConnection) -> Result<impl IntoResponse, BlogError> {
    let entries = {
        let mut lease = db.lock().await;
        EntryStore::new(lease.get_mut()?).count().await?
    };
    Ok((
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            entries,
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    ))
}

/// System routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
