//! Pure aggregation of analytics events.
//!
//! Nothing in here performs I/O; the metrics service feeds it events or a
//! server-side rollup and gets back a [`crate::domain::entities::MetricsReport`].
//!
//! - [`window`] - Current vs previous window totals and the shared change rule
//! - [`rollup`] - Per-category counts with percentages reconciled to 100
//! - [`classify`] - Device, browser and country normalization
//! - [`visitors`] - Unique visitor counting
//! - [`trend`] - Zero-filled trend buckets
//! - [`report`] - Report assembly for both data sources

pub mod classify;
pub mod report;
pub mod rollup;
pub mod trend;
pub mod visitors;
pub mod window;

pub use report::{report_from_aggregate, report_from_events};
pub use rollup::{rollup, rollup_counts, top_categories};
pub use window::{compute_window, conversion_rate, format_percent_change, percent_change};
