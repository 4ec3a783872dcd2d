//! DTOs for profile view tracking.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request body for `POST /api/views/{owner_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordViewRequest {
    /// Page or profile identifier the view belongs to.
    #[validate(length(min = 1, max = 200))]
    pub subject_id: String,
}

/// Acknowledgement returned after a view was stored.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordViewResponse {
    pub id: i64,
}
