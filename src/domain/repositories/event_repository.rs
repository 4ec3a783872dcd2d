//! Repository trait for analytics events and server-side rollups.

use crate::domain::entities::{
    AnalyticsEvent, NewAnalyticsEvent, OverviewAggregate, TimeRange, TrendGranularity,
    WindowRanges,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Filter for raw event queries.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    pub owner_id: String,
    /// Restricts results to one link code or profile id.
    pub subject_id: Option<String>,
    pub range: TimeRange,
}

impl EventQuery {
    pub fn new(owner_id: impl Into<String>, range: TimeRange) -> Self {
        Self {
            owner_id: owner_id.into(),
            subject_id: None,
            range,
        }
    }

    pub fn with_subject(mut self, subject_id: Option<String>) -> Self {
        self.subject_id = subject_id;
        self
    }
}

/// Repository interface for analytics events.
///
/// Events are append-only: they are recorded once and afterwards only read.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgEventRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Appends a new event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent, AppError>;

    /// Returns every event of the owner within `query.range`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn query_events(&self, query: &EventQuery) -> Result<Vec<AnalyticsEvent>, AppError>;

    /// Fetches a precomputed rollup for both windows, if the store has one.
    ///
    /// `Ok(None)` means no rollup is available; callers fall back to raw
    /// events in that case as well as on error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AggregationSourceUnavailable`] when the rollup
    /// source fails.
    async fn precomputed_overview(
        &self,
        owner_id: &str,
        ranges: &WindowRanges,
        granularity: TrendGranularity,
    ) -> Result<Option<OverviewAggregate>, AppError>;
}
