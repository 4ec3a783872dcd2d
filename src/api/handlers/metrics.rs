//! Handlers for analytics endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::metrics::MetricsQuery;
use crate::api::extractors::OwnerId;
use crate::domain::entities::MetricsReport;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the caller's metrics report.
///
/// # Endpoint
///
/// `GET /api/metrics?time_frame=7d`
///
/// `time_frame` is one of `24h`, `7d`, `30d` (default), `90d`, `1y`.
///
/// # Response
///
/// ```json
/// {
///   "time_frame": "7d",
///   "overview": {
///     "clicks": { "current_total": 120, "previous_total": 80, "percent_change": 50.0 },
///     ...
///   },
///   "by_device": { "total": 120, "items": [{ "category": "Mobile", "count": 90, "percentage": 75 }, ...] },
///   "top_countries": [...],
///   "trend_series": [{ "bucket_start": "...", "clicks": 3, "views": 10 }, ...],
///   "source": "precomputed"
/// }
/// ```
///
/// # Errors
///
/// Returns 503 if neither the precomputed nor the raw-event path succeeded.
pub async fn metrics_handler(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsReport>, AppError> {
    let report = state
        .metrics_service
        .get_metrics(&owner_id, query.time_frame)
        .await?;

    Ok(Json(report))
}

/// Returns the metrics report of a single owned link.
///
/// # Endpoint
///
/// `GET /api/metrics/links/{code}?time_frame=24h`
///
/// # Errors
///
/// - 404 if the link doesn't exist or is inactive
/// - 403 if the link belongs to another owner
/// - 503 if events could not be loaded
pub async fn link_metrics_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsReport>, AppError> {
    let report = state
        .metrics_service
        .get_link_metrics(&owner_id, &code, query.time_frame)
        .await?;

    Ok(Json(report))
}
