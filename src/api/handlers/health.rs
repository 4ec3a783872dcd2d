//! `GET /health`: liveness plus a storage round trip.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, Health, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Answers 200 with `"healthy"` when the store responds, otherwise 503 with
/// `"degraded"` and the storage error in `checks.storage.message`.
///
/// ```json
/// {"status":"healthy","version":"0.1.0","checks":{"storage":{"status":"ok","message":"postgres"}}}
/// ```
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = match state.link_service.check_store().await {
        Ok(()) => CheckStatus::ok(state.storage),
        Err(e) => {
            tracing::warn!(storage = state.storage, error = %e, "storage probe failed");
            CheckStatus::error(format!("{}: {}", state.storage, e))
        }
    };

    let checks = HealthChecks { storage };
    let status = checks.overall();
    let code = match status {
        Health::Healthy => StatusCode::OK,
        Health::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }),
    )
}
