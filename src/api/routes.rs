//! API route configuration.
//!
//! Owner-scoped endpoints read the caller from the `X-Owner-Id` header via
//! [`crate::api::extractors::OwnerId`].

use crate::api::handlers::{
    availability_handler, create_link_handler, delete_link_handler, link_metrics_handler,
    list_links_handler, metrics_handler, record_view_handler, update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `POST   /links`                      - Allocate a short link
/// - `GET    /links`                      - List the caller's links
/// - `GET    /links/availability/{code}`  - Live custom code check
/// - `PATCH  /links/{code}`               - Update target, title or expiry
/// - `DELETE /links/{code}`               - Soft-delete a link
/// - `GET    /metrics`                    - Owner metrics report
/// - `GET    /metrics/links/{code}`       - Single link metrics report
/// - `POST   /views/{owner_id}`           - Record a profile page view
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route("/links/availability/{code}", get(availability_handler))
        .route(
            "/links/{code}",
            patch(update_link_handler).delete(delete_link_handler),
        )
        .route("/metrics", get(metrics_handler))
        .route("/metrics/links/{code}", get(link_metrics_handler))
        .route("/views/{owner_id}", post(record_view_handler))
}
