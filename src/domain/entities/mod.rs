//! Core domain entities and value objects.
//!
//! - [`ShortLink`] - A short code mapped to a target URL
//! - [`AnalyticsEvent`] - An immutable click or view event
//! - [`MetricsReport`] and friends - Derived, never persisted aggregation results
//!
//! Entities follow the "New Type" pattern with separate structs for creation
//! (`NewShortLink`, `NewAnalyticsEvent`) and partial updates (`LinkPatch`).

pub mod event;
pub mod link;
pub mod metrics;

pub use event::{AnalyticsEvent, EventType, NewAnalyticsEvent, VisitContext};
pub use link::{LinkPatch, NewShortLink, ShortLink};
pub use metrics::{
    CategoryCount, CategoryShare, DimensionalBreakdown, MetricWindow, MetricsOverview,
    MetricsReport, MetricsSource, OverviewAggregate, PeriodTotals, RateWindow, TimeFrame,
    TimeRange, TrendGranularity, TrendPoint, WindowRanges,
};
