//! Handler for profile page view tracking.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::views::{RecordViewRequest, RecordViewResponse};
use crate::api::extractors::ClientVisit;
use crate::error::AppError;
use crate::state::AppState;

/// Records a view of an owner's public page.
///
/// # Endpoint
///
/// `POST /api/views/{owner_id}`
///
/// Called by the public profile page, so no owner header is required.
/// Views form the denominator of the conversion rate.
pub async fn record_view_handler(
    Path(owner_id): Path<String>,
    State(state): State<AppState>,
    ClientVisit(ctx): ClientVisit,
    Json(payload): Json<RecordViewRequest>,
) -> Result<(StatusCode, Json<RecordViewResponse>), AppError> {
    payload.validate()?;

    let event = state
        .tracking_service
        .record_view(&owner_id, &payload.subject_id, &ctx)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RecordViewResponse { id: event.id }),
    ))
}
