//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use validator::Validate;

use crate::application::services::Availability;
use crate::domain::entities::ShortLink;

/// Request body for `POST /api/links`.
///
/// Custom codes go through the slug rules in the service, so only size
/// limits are checked here.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// Absolute http(s) destination URL.
    #[validate(length(min = 1, max = 2048))]
    pub target_url: String,

    /// Optional custom short code.
    #[validate(length(max = 100))]
    pub custom_code: Option<String>,

    /// Display title; derived from the target host when absent.
    #[validate(length(max = 200))]
    pub title: Option<String>,

    /// After this time the link resolves to 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for `PATCH /api/links/{code}`.
///
/// All fields are optional, only provided fields are changed.
///
/// # `expires_at` semantics
///
/// - **Absent** (`expires_at` not in JSON) → leave existing value unchanged
/// - **`null`** → clear expiry (link never expires)
/// - **Timestamp** → set new expiry
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048))]
    pub target_url: Option<String>,

    #[validate(length(max = 200))]
    pub title: Option<String>,

    /// Expiry timestamp. Absent = no change, null = clear, value = set.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

/// JSON representation of a link.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub code: String,
    pub short_url: String,
    pub target_url: String,
    pub title: String,
    pub active: bool,
    pub click_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: ShortLink, short_url: String) -> Self {
        Self {
            code: link.code,
            short_url,
            target_url: link.target_url,
            title: link.title,
            active: link.active,
            click_count: link.click_count,
            expires_at: link.expires_at,
            created_at: link.created_at,
        }
    }
}

/// Response for `GET /api/links`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkResponse>,
}

/// Response for `GET /api/links/availability/{code}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub code: String,
    pub available: bool,

    /// Rejection reason shown next to the input field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AvailabilityResponse {
    pub fn new(code: String, availability: Availability) -> Self {
        let reason = match availability {
            Availability::Available => None,
            Availability::Taken => Some("This code is already taken".to_string()),
            Availability::Invalid(e) => Some(e.to_string()),
        };

        Self {
            code,
            available: availability.is_available(),
            reason,
        }
    }
}
