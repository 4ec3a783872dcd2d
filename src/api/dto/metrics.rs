//! DTOs for analytics endpoints.
//!
//! The report itself is [`crate::domain::entities::MetricsReport`], serialized
//! as-is.

use serde::Deserialize;

use crate::domain::entities::TimeFrame;

/// Query parameters for `GET /api/metrics` and `GET /api/metrics/links/{code}`.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    /// Defaults to `30d`.
    #[serde(default)]
    pub time_frame: TimeFrame,
}
