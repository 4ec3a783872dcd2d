//! Value objects produced by analytics aggregation.
//!
//! None of these are persisted; every report is recomputed per request.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Half-open time range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    pub fn length(&self) -> Duration {
        self.end - self.start
    }
}

/// The current window and the equally long window immediately before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowRanges {
    pub current: TimeRange,
    pub previous: TimeRange,
}

impl WindowRanges {
    /// Builds `current = [now - len, now)` and `previous = [now - 2*len, now - len)`.
    pub fn ending_at(now: DateTime<Utc>, window_length: Duration) -> Self {
        let boundary = now - window_length;
        Self {
            current: TimeRange::new(boundary, now),
            previous: TimeRange::new(boundary - window_length, boundary),
        }
    }

    /// The full span covered by both windows.
    pub fn span(&self) -> TimeRange {
        TimeRange::new(self.previous.start, self.current.end)
    }
}

/// Bucket size used for trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendGranularity {
    Hour,
    Day,
}

impl TrendGranularity {
    pub fn step(&self) -> Duration {
        match self {
            TrendGranularity::Hour => Duration::hours(1),
            TrendGranularity::Day => Duration::days(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendGranularity::Hour => "hour",
            TrendGranularity::Day => "day",
        }
    }
}

/// Reporting period selectable by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFrame {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl TimeFrame {
    pub fn window(&self) -> Duration {
        match self {
            TimeFrame::Day => Duration::days(1),
            TimeFrame::Week => Duration::days(7),
            TimeFrame::Month => Duration::days(30),
            TimeFrame::Quarter => Duration::days(90),
            TimeFrame::Year => Duration::days(365),
        }
    }

    pub fn granularity(&self) -> TrendGranularity {
        match self {
            TimeFrame::Day => TrendGranularity::Hour,
            _ => TrendGranularity::Day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Day => "24h",
            TimeFrame::Week => "7d",
            TimeFrame::Month => "30d",
            TimeFrame::Quarter => "90d",
            TimeFrame::Year => "1y",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "24h" | "1d" => Ok(TimeFrame::Day),
            "7d" => Ok(TimeFrame::Week),
            "30d" => Ok(TimeFrame::Month),
            "90d" => Ok(TimeFrame::Quarter),
            "1y" | "365d" => Ok(TimeFrame::Year),
            other => Err(format!(
                "unknown time frame '{other}', expected one of 24h, 7d, 30d, 90d, 1y"
            )),
        }
    }
}

/// Current vs previous totals of a counted metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricWindow {
    pub current_total: u64,
    pub previous_total: u64,
    /// Signed change in percent, one decimal.
    pub percent_change: f64,
}

/// Current vs previous values of a ratio metric, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateWindow {
    pub current: f64,
    pub previous: f64,
    pub percent_change: f64,
}

/// One category of a dimensional breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub count: u64,
    pub percentage: u32,
}

/// Per-category counts and integer shares of a single dimension.
///
/// Shares sum to exactly 100 whenever `total > 0` and are all zero otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DimensionalBreakdown {
    pub total: u64,
    pub items: Vec<CategoryShare>,
}

impl DimensionalBreakdown {
    pub fn percentage_sum(&self) -> u32 {
        self.items.iter().map(|item| item.percentage).sum()
    }

    pub fn get(&self, category: &str) -> Option<&CategoryShare> {
        self.items.iter().find(|item| item.category == category)
    }
}

/// Clicks and views falling into one trend bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub bucket_start: DateTime<Utc>,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub views: u64,
}

/// Which path produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSource {
    Precomputed,
    RawEvents,
}

/// Headline numbers with period-over-period comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsOverview {
    pub clicks: MetricWindow,
    pub views: MetricWindow,
    pub unique_visitors: MetricWindow,
    pub conversion_rate: RateWindow,
}

/// Full analytics report for an owner or a single link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub time_frame: TimeFrame,
    pub range: TimeRange,
    pub granularity: TrendGranularity,
    pub overview: MetricsOverview,
    pub by_device: DimensionalBreakdown,
    pub by_browser: DimensionalBreakdown,
    pub by_country: DimensionalBreakdown,
    pub top_countries: Vec<CategoryShare>,
    pub trend_series: Vec<TrendPoint>,
    pub source: MetricsSource,
}

/// Totals for the current and previous window as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct PeriodTotals {
    #[serde(default)]
    pub current: u64,
    #[serde(default)]
    pub previous: u64,
}

/// Raw (pre-normalization) category count from a server-side rollup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryCount {
    pub category: Option<String>,
    pub count: u64,
}

/// Server-side rollup of an owner's events for a pair of windows.
///
/// Dimension counts are grouped by raw value; the service normalizes and
/// reconciles them with the same rules as the raw-event path.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OverviewAggregate {
    #[serde(default)]
    pub clicks: PeriodTotals,
    #[serde(default)]
    pub views: PeriodTotals,
    #[serde(default)]
    pub unique_visitors: PeriodTotals,
    #[serde(default)]
    pub devices: Vec<CategoryCount>,
    #[serde(default)]
    pub browsers: Vec<CategoryCount>,
    #[serde(default)]
    pub countries: Vec<CategoryCount>,
    #[serde(default)]
    pub trend: Vec<TrendPoint>,
}

impl OverviewAggregate {
    /// Returns true if the rollup carries no data at all.
    pub fn is_empty(&self) -> bool {
        self.clicks == PeriodTotals::default()
            && self.views == PeriodTotals::default()
            && self.unique_visitors == PeriodTotals::default()
            && self.devices.is_empty()
            && self.browsers.is_empty()
            && self.countries.is_empty()
            && self.trend.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_ranges_are_adjacent_and_half_open() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let ranges = WindowRanges::ending_at(now, Duration::days(30));

        assert_eq!(ranges.current.end, now);
        assert_eq!(ranges.current.start, ranges.previous.end);
        assert_eq!(ranges.previous.length(), Duration::days(30));
        assert!(!ranges.current.contains(now));
        assert!(ranges.current.contains(ranges.current.start));
        assert!(!ranges.previous.contains(ranges.current.start));
    }

    #[test]
    fn test_time_frame_parse() {
        assert_eq!("7d".parse::<TimeFrame>().unwrap(), TimeFrame::Week);
        assert_eq!("24H".parse::<TimeFrame>().unwrap(), TimeFrame::Day);
        assert_eq!("1y".parse::<TimeFrame>().unwrap(), TimeFrame::Year);
        assert!("2w".parse::<TimeFrame>().is_err());
    }

    #[test]
    fn test_time_frame_serde_names_match_display() {
        for frame in [
            TimeFrame::Day,
            TimeFrame::Week,
            TimeFrame::Month,
            TimeFrame::Quarter,
            TimeFrame::Year,
        ] {
            let json = serde_json::to_string(&frame).unwrap();
            assert_eq!(json, format!("\"{}\"", frame));
        }
    }

    #[test]
    fn test_granularity_by_frame() {
        assert_eq!(TimeFrame::Day.granularity(), TrendGranularity::Hour);
        assert_eq!(TimeFrame::Month.granularity(), TrendGranularity::Day);
    }

    #[test]
    fn test_aggregate_deserializes_with_missing_fields() {
        let json = serde_json::json!({
            "clicks": { "current": 10, "previous": 4 },
            "devices": [{ "category": "iPhone", "count": 3 }, { "category": null, "count": 1 }]
        });

        let aggregate: OverviewAggregate = serde_json::from_value(json).unwrap();

        assert_eq!(aggregate.clicks.current, 10);
        assert_eq!(aggregate.views, PeriodTotals::default());
        assert_eq!(aggregate.devices[1].category, None);
        assert!(!aggregate.is_empty());
        assert!(OverviewAggregate::default().is_empty());
    }
}
