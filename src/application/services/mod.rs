//! Business logic services for the application layer.

pub mod link_service;
pub mod metrics_service;
pub mod tracking_service;

pub use link_service::{AllocateLink, Availability, LinkService};
pub use metrics_service::MetricsService;
pub use tracking_service::TrackingService;
