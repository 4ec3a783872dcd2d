//! Handlers for link management endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::links::{
    AvailabilityResponse, CreateLinkRequest, LinkListResponse, LinkResponse, UpdateLinkRequest,
};
use crate::api::extractors::OwnerId;
use crate::application::services::AllocateLink;
use crate::domain::entities::LinkPatch;
use crate::error::AppError;
use crate::state::AppState;

/// Allocates a new short link for the calling owner.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "target_url": "https://example.com/landing",
///   "custom_code": "spring-sale",   // optional
///   "title": "Spring sale",         // optional
///   "expires_at": "2026-12-31T23:59:59Z"  // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 for an invalid URL or custom code
/// - 409 if the custom code is taken
/// - 503 if no generated code was free
pub async fn create_link_handler(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .allocate(AllocateLink {
            target_url: payload.target_url,
            owner_id,
            custom_code: payload.custom_code,
            title: payload.title,
            expires_at: payload.expires_at,
        })
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok((StatusCode::CREATED, Json(LinkResponse::new(link, short_url))))
}

/// Lists the caller's links, newest first, inactive ones included.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links(&owner_id).await?;

    let items: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link.code);
            LinkResponse::new(link, short_url)
        })
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Checks whether a custom code could be allocated right now.
///
/// # Endpoint
///
/// `GET /api/links/availability/{code}`
///
/// Invalid codes are reported with their rejection reason rather than as an
/// error, so the UI can show feedback while the user types.
pub async fn availability_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let availability = state.link_service.check_availability(&code).await?;

    Ok(Json(AvailabilityResponse::new(code, availability)))
}

/// Partially updates a short link.
///
/// # Endpoint
///
/// `PATCH /api/links/{code}`
///
/// # Request Body
///
/// All fields are optional. Only provided fields are changed.
///
/// ```json
/// {
///   "target_url": "https://new-destination.com",
///   "title": "New title",
///   "expires_at": null   // clears the expiry
/// }
/// ```
///
/// # Errors
///
/// - 404 if the link doesn't exist or is inactive
/// - 403 if the link belongs to another owner
pub async fn update_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;

    let patch = LinkPatch {
        target_url: payload.target_url,
        title: payload.title,
        expires_at: payload.expires_at,
    };

    let link = state
        .link_service
        .update_link(&code, &owner_id, patch)
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(LinkResponse::new(link, short_url)))
}

/// Soft-deletes a short link.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
///
/// # Behavior
///
/// - The record is kept with `active = false` and the code is never reused.
/// - Subsequent redirect requests for this code return **410 Gone**.
/// - Clicks on the link drop out of the owner's metrics.
///
/// # Errors
///
/// - 404 if the link doesn't exist or is already inactive
/// - 403 if the link belongs to another owner
pub async fn delete_link_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> Result<StatusCode, AppError> {
    state.link_service.deactivate_link(&code, &owner_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
