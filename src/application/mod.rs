//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link allocation, management and resolution
//! - [`services::tracking_service::TrackingService`] - Click and view recording
//! - [`services::metrics_service::MetricsService`] - Analytics reports with fallback

pub mod services;
