//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::api::extractors::ClientVisit;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the code (active or not)
/// 2. Reject inactive or expired links
/// 3. Record a click event with the visitor's metadata
/// 4. Return 307 Temporary Redirect
///
/// Click recording is best effort and never blocks the redirect.
///
/// # Errors
///
/// - 404 Not Found if the code doesn't exist
/// - 410 Gone if the link is inactive or expired
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    ClientVisit(ctx): ClientVisit,
) -> Result<Redirect, AppError> {
    let link = state.link_service.resolve(&code, &ctx).await?;

    tracing::debug!(%code, target = %link.target_url, "redirecting");

    Ok(Redirect::temporary(&link.target_url))
}
