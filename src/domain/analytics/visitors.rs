//! Unique visitor counting.

use std::collections::HashSet;

use crate::domain::entities::{AnalyticsEvent, MetricWindow, TimeRange, WindowRanges};

/// Number of distinct visitors among events within `range`.
///
/// Counts the cardinality of [`AnalyticsEvent::visitor_id`], never events.
pub fn count_unique_visitors(events: &[AnalyticsEvent], range: &TimeRange) -> u64 {
    events
        .iter()
        .filter(|event| range.contains(event.occurred_at))
        .map(AnalyticsEvent::visitor_id)
        .collect::<HashSet<_>>()
        .len() as u64
}

/// Unique visitors of both windows, compared with the shared change rule.
pub fn unique_visitor_window(events: &[AnalyticsEvent], ranges: &WindowRanges) -> MetricWindow {
    MetricWindow::from_totals(
        count_unique_visitors(events, &ranges.current),
        count_unique_visitors(events, &ranges.previous),
    )
}
