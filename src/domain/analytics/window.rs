//! Period-over-period comparison.
//!
//! Every comparison in a report (clicks, views, unique visitors, conversion
//! rate) goes through [`percent_change`], so they all agree on zero handling
//! and rounding.

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::{MetricWindow, RateWindow, WindowRanges};

/// Percentage change from `previous` to `current`, rounded to one decimal
/// with halves away from zero.
///
/// - `previous == 0`: `100.0` if `current > 0`, else `0.0`
/// - otherwise `(current - previous) / previous * 100`
///
/// Inputs are counts or rates already rounded to one decimal; the quotient is
/// computed exactly in tenths so `80 -> 103` reports `28.8`, not `28.7`.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    let current = to_tenths(current);
    let previous = to_tenths(previous);

    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }

    div_round_half_away((current - previous) * 1000, previous) as f64 / 10.0
}

/// Formats a change for display: `+50.0%`, `-12.5%`, `0.0%`.
pub fn format_percent_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{:.1}%", change)
    } else if change == 0.0 {
        // Avoids rendering "-0.0%".
        "0.0%".to_string()
    } else {
        format!("{:.1}%", change)
    }
}

/// Conversion rate in percent, `clicks / views * 100`, one decimal.
///
/// Capped at 100: views undercount relative to clicks when tracking drops a
/// page view, and a share above 100% is meaningless. Zero views yield 0.
pub fn conversion_rate(clicks: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }

    let tenths = div_round_half_away(clicks as i128 * 1000, views as i128);
    tenths.min(1000) as f64 / 10.0
}

fn to_tenths(value: f64) -> i128 {
    (value * 10.0).round() as i128
}

/// `numerator / denominator` rounded to the nearest integer, halves away from
/// zero. `denominator` must be non-zero.
fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    let (numerator, denominator) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };

    let half_up = (numerator.abs() * 2 + denominator) / (2 * denominator);
    if numerator < 0 { -half_up } else { half_up }
}

impl MetricWindow {
    pub fn from_totals(current_total: u64, previous_total: u64) -> Self {
        Self {
            current_total,
            previous_total,
            percent_change: percent_change(current_total as f64, previous_total as f64),
        }
    }

    /// Display form of [`MetricWindow::percent_change`].
    pub fn display_change(&self) -> String {
        format_percent_change(self.percent_change)
    }
}

impl RateWindow {
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            percent_change: percent_change(current, previous),
        }
    }

    /// Conversion rate comparison from click and view totals of both windows.
    pub fn conversion(clicks: &MetricWindow, views: &MetricWindow) -> Self {
        Self::new(
            conversion_rate(clicks.current_total, views.current_total),
            conversion_rate(clicks.previous_total, views.previous_total),
        )
    }
}

/// Counts timestamps into the current and previous window ending at `now`.
///
/// Timestamps outside both windows are ignored.
pub fn compute_window<I>(timestamps: I, now: DateTime<Utc>, window_length: Duration) -> MetricWindow
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    count_in_windows(timestamps, &WindowRanges::ending_at(now, window_length))
}

/// Counts timestamps into prebuilt window ranges.
pub fn count_in_windows<I>(timestamps: I, ranges: &WindowRanges) -> MetricWindow
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let (current, previous) = timestamps
        .into_iter()
        .fold((0u64, 0u64), |(current, previous), at| {
            if ranges.current.contains(at) {
                (current + 1, previous)
            } else if ranges.previous.contains(at) {
                (current, previous + 1)
            } else {
                (current, previous)
            }
        });

    MetricWindow::from_totals(current, previous)
}
