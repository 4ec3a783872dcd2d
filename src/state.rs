//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, MetricsService, TrackingService};
use crate::domain::repositories::{EventRepository, LinkRepository};
use crate::infrastructure::persistence::InMemoryStore;
use crate::utils::visitor_hash::VisitorHasher;

pub type DynLinkService = LinkService<dyn LinkRepository, dyn EventRepository>;
pub type DynTrackingService = TrackingService<dyn EventRepository>;
pub type DynMetricsService = MetricsService<dyn LinkRepository, dyn EventRepository>;

/// Services shared across request handlers.
///
/// Repositories sit behind trait objects so the same router serves
/// PostgreSQL and the in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    pub tracking_service: Arc<DynTrackingService>,
    pub metrics_service: Arc<DynMetricsService>,
    /// `"postgres"` or `"memory"`, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Wires all services on top of the given repositories.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        events: Arc<dyn EventRepository>,
        hasher: VisitorHasher,
        public_base_url: impl Into<String>,
        use_precomputed: bool,
        storage: &'static str,
    ) -> Self {
        let tracking_service = Arc::new(TrackingService::new(events.clone(), hasher));
        let link_service = Arc::new(LinkService::new(
            links.clone(),
            tracking_service.clone(),
            public_base_url,
        ));
        let metrics_service = Arc::new(MetricsService::new(links, events, use_precomputed));

        Self {
            link_service,
            tracking_service,
            metrics_service,
            storage,
        }
    }

    /// Builds state backed by a single [`InMemoryStore`].
    pub fn in_memory(
        store: Arc<InMemoryStore>,
        hasher: VisitorHasher,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self::new(
            store.clone(),
            store,
            hasher,
            public_base_url,
            false,
            "memory",
        )
    }
}
