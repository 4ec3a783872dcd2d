//! Analytics reports with precomputed fast path and raw-event fallback.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;

use crate::domain::analytics::{report_from_aggregate, report_from_events};
use crate::domain::entities::{
    AnalyticsEvent, EventType, MetricsReport, TimeFrame, WindowRanges,
};
use crate::domain::repositories::{EventQuery, EventRepository, LinkRepository};
use crate::error::AppError;

/// Service producing [`MetricsReport`]s for owners and single links.
///
/// Owner reports first ask the event store for a server-side rollup. If that
/// call fails or has no data, the same report is computed from raw events.
/// Only when both paths fail does the caller see an error, and it is always
/// [`AppError::MetricsUnavailable`], never a partial report.
pub struct MetricsService<L: LinkRepository + ?Sized, E: EventRepository + ?Sized> {
    links: Arc<L>,
    events: Arc<E>,
    use_precomputed: bool,
}

impl<L: LinkRepository + ?Sized, E: EventRepository + ?Sized> MetricsService<L, E> {
    /// Creates a new metrics service.
    ///
    /// With `use_precomputed = false` every report comes from raw events.
    pub fn new(links: Arc<L>, events: Arc<E>, use_precomputed: bool) -> Self {
        Self {
            links,
            events,
            use_precomputed,
        }
    }

    /// Report for all links and profile views of an owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::MetricsUnavailable`] if neither source could be read.
    pub async fn get_metrics(
        &self,
        owner_id: &str,
        time_frame: TimeFrame,
    ) -> Result<MetricsReport, AppError> {
        self.get_metrics_at(owner_id, time_frame, Utc::now()).await
    }

    /// Same as [`Self::get_metrics`] with windows ending at `now`.
    pub async fn get_metrics_at(
        &self,
        owner_id: &str,
        time_frame: TimeFrame,
        now: DateTime<Utc>,
    ) -> Result<MetricsReport, AppError> {
        let ranges = WindowRanges::ending_at(now, time_frame.window());

        if self.use_precomputed {
            match self
                .events
                .precomputed_overview(owner_id, &ranges, time_frame.granularity())
                .await
            {
                Ok(Some(aggregate)) if !aggregate.is_empty() => {
                    return Ok(report_from_aggregate(time_frame, &ranges, &aggregate));
                }
                Ok(_) => {
                    counter!("metrics_fallback_total", "reason" => "no_data").increment(1);
                    tracing::debug!(%owner_id, "no precomputed overview, using raw events");
                }
                Err(e) => {
                    counter!("metrics_fallback_total", "reason" => "error").increment(1);
                    tracing::warn!(%owner_id, error = %e, "precomputed overview failed, using raw events");
                }
            }
        }

        let query = EventQuery::new(owner_id, ranges.span());
        self.raw_report(&query, time_frame, &ranges).await
    }

    /// Report restricted to clicks on a single link.
    ///
    /// Always computed from raw events.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the link does not exist or is inactive
    /// - [`AppError::Unauthorized`] if another owner holds the code
    /// - [`AppError::MetricsUnavailable`] if events could not be read
    pub async fn get_link_metrics(
        &self,
        owner_id: &str,
        code: &str,
        time_frame: TimeFrame,
    ) -> Result<MetricsReport, AppError> {
        self.get_link_metrics_at(owner_id, code, time_frame, Utc::now())
            .await
    }

    /// Same as [`Self::get_link_metrics`] with windows ending at `now`.
    pub async fn get_link_metrics_at(
        &self,
        owner_id: &str,
        code: &str,
        time_frame: TimeFrame,
        now: DateTime<Utc>,
    ) -> Result<MetricsReport, AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .filter(|link| link.active)
            .ok_or_else(|| AppError::not_found("Short link not found"))?;

        if !link.is_owned_by(owner_id) {
            return Err(AppError::Unauthorized);
        }

        let ranges = WindowRanges::ending_at(now, time_frame.window());
        let query = EventQuery::new(owner_id, ranges.span()).with_subject(Some(link.code));
        self.raw_report(&query, time_frame, &ranges).await
    }

    async fn raw_report(
        &self,
        query: &EventQuery,
        time_frame: TimeFrame,
        ranges: &WindowRanges,
    ) -> Result<MetricsReport, AppError> {
        let events = self.load_active_events(query).await.map_err(|e| {
            tracing::error!(owner_id = %query.owner_id, error = %e, "metrics unavailable from every source");
            AppError::MetricsUnavailable
        })?;

        Ok(report_from_events(time_frame, ranges, &events))
    }

    /// Raw events of the query, minus clicks on the owner's inactive links.
    async fn load_active_events(&self, query: &EventQuery) -> Result<Vec<AnalyticsEvent>, AppError> {
        let events = self.events.query_events(query).await?;

        let inactive: HashSet<String> = self
            .links
            .list_by_owner(&query.owner_id)
            .await?
            .into_iter()
            .filter(|link| !link.active)
            .map(|link| link.code)
            .collect();

        if inactive.is_empty() {
            return Ok(events);
        }

        Ok(events
            .into_iter()
            .filter(|e| !(e.event_type == EventType::Click && inactive.contains(&e.subject_id)))
            .collect())
    }
}
