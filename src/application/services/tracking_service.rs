//! Click and view event recording.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::{
    AnalyticsEvent, EventType, NewAnalyticsEvent, ShortLink, VisitContext,
};
use crate::domain::repositories::EventRepository;
use crate::error::AppError;
use crate::utils::visitor_hash::VisitorHasher;

/// Service that turns request metadata into stored analytics events.
///
/// Dimension values are stored raw; only the visitor IP is transformed, into
/// a keyed hash, before anything is persisted.
pub struct TrackingService<E: EventRepository + ?Sized> {
    repository: Arc<E>,
    hasher: VisitorHasher,
}

impl<E: EventRepository + ?Sized> TrackingService<E> {
    /// Creates a new tracking service.
    pub fn new(repository: Arc<E>, hasher: VisitorHasher) -> Self {
        Self { repository, hasher }
    }

    /// Records a click on a resolved short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn record_click(
        &self,
        link: &ShortLink,
        ctx: &VisitContext,
    ) -> Result<AnalyticsEvent, AppError> {
        let event = self.build_event(EventType::Click, &link.code, &link.owner_id, ctx);
        self.repository.record(event).await
    }

    /// Records a view of an owner's profile page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] if `owner_id` or `subject_id` is blank.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn record_view(
        &self,
        owner_id: &str,
        subject_id: &str,
        ctx: &VisitContext,
    ) -> Result<AnalyticsEvent, AppError> {
        if owner_id.trim().is_empty() || subject_id.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "owner and subject are required".to_string(),
            ));
        }

        let event = self.build_event(EventType::View, subject_id, owner_id, ctx);
        self.repository.record(event).await
    }

    fn build_event(
        &self,
        event_type: EventType,
        subject_id: &str,
        owner_id: &str,
        ctx: &VisitContext,
    ) -> NewAnalyticsEvent {
        NewAnalyticsEvent {
            event_type,
            subject_id: subject_id.to_string(),
            owner_id: owner_id.to_string(),
            device_type: ctx.device_type.clone().or_else(|| ctx.user_agent.clone()),
            browser: ctx.user_agent.clone(),
            country_code: ctx.country_code.clone(),
            visitor_hash: ctx.ip.as_deref().and_then(|ip| self.hasher.hash(ip)),
            occurred_at: Utc::now(),
            lat: ctx.lat,
            lng: ctx.lng,
        }
    }
}
