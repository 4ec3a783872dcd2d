//! Assembly of [`MetricsReport`]s from either data source.
//!
//! [`report_from_events`] and [`report_from_aggregate`] share every formula
//! and finish through the same constructor, so callers cannot tell which
//! path produced a report except by its `source` field.

use chrono::{DateTime, Utc};

use crate::domain::entities::{
    AnalyticsEvent, CategoryCount, DimensionalBreakdown, EventType, MetricWindow,
    MetricsOverview, MetricsReport, MetricsSource, OverviewAggregate, PeriodTotals, RateWindow,
    TimeFrame, TrendPoint, WindowRanges,
};

use super::classify::{
    DEVICE_CATEGORIES, UNKNOWN, classify_browser, classify_country, classify_device,
};
use super::rollup::{rollup, rollup_counts, top_categories};
use super::trend::{bucket_events, regrid};
use super::visitors::unique_visitor_window;
use super::window::count_in_windows;

/// Number of entries in [`MetricsReport::top_countries`].
pub const TOP_COUNTRIES: usize = 5;

struct Breakdowns {
    device: DimensionalBreakdown,
    browser: DimensionalBreakdown,
    country: DimensionalBreakdown,
}

/// Computes a report from raw events covering both windows.
///
/// Dimensional breakdowns cover click events of the current window.
pub fn report_from_events(
    time_frame: TimeFrame,
    ranges: &WindowRanges,
    events: &[AnalyticsEvent],
) -> MetricsReport {
    let clicks = count_in_windows(timestamps_of(events, EventType::Click), ranges);
    let views = count_in_windows(timestamps_of(events, EventType::View), ranges);
    let unique_visitors = unique_visitor_window(events, ranges);

    let current_clicks: Vec<&AnalyticsEvent> = events
        .iter()
        .filter(|e| e.event_type == EventType::Click && ranges.current.contains(e.occurred_at))
        .collect();

    let breakdowns = Breakdowns {
        device: rollup(
            &current_clicks,
            |e| classify_device(e.device_type.as_deref()),
            DEVICE_CATEGORIES,
        ),
        browser: rollup(&current_clicks, |e| classify_browser(e.browser.as_deref()), &[]),
        country: rollup(&current_clicks, |e| classify_country(e.country_code.as_deref()), &[]),
    };

    let trend = bucket_events(events, &ranges.current, time_frame.granularity());

    assemble(
        time_frame,
        ranges,
        (clicks, views, unique_visitors),
        breakdowns,
        trend,
        MetricsSource::RawEvents,
    )
}

/// Computes a report from a server-side rollup.
///
/// Raw category values are normalized with the same classifiers as the raw
/// path before reconciliation.
pub fn report_from_aggregate(
    time_frame: TimeFrame,
    ranges: &WindowRanges,
    aggregate: &OverviewAggregate,
) -> MetricsReport {
    let breakdowns = Breakdowns {
        device: rollup_counts(
            normalize_counts(&aggregate.devices, |raw| classify_device(raw).to_string()),
            DEVICE_CATEGORIES,
        ),
        browser: rollup_counts(
            normalize_counts(&aggregate.browsers, |raw| classify_browser(raw).to_string()),
            &[],
        ),
        country: rollup_counts(normalize_counts(&aggregate.countries, classify_country), &[]),
    };

    let trend = regrid(&aggregate.trend, &ranges.current, time_frame.granularity());

    assemble(
        time_frame,
        ranges,
        (
            period_window(&aggregate.clicks),
            period_window(&aggregate.views),
            period_window(&aggregate.unique_visitors),
        ),
        breakdowns,
        trend,
        MetricsSource::Precomputed,
    )
}

fn timestamps_of(
    events: &[AnalyticsEvent],
    kind: EventType,
) -> impl Iterator<Item = DateTime<Utc>> + '_ {
    events
        .iter()
        .filter(move |e| e.event_type == kind)
        .map(|e| e.occurred_at)
}

fn period_window(totals: &PeriodTotals) -> MetricWindow {
    MetricWindow::from_totals(totals.current, totals.previous)
}

fn normalize_counts<F>(counts: &[CategoryCount], classify: F) -> Vec<(String, u64)>
where
    F: Fn(Option<&str>) -> String,
{
    counts
        .iter()
        .map(|c| (classify(c.category.as_deref()), c.count))
        .collect()
}

fn assemble(
    time_frame: TimeFrame,
    ranges: &WindowRanges,
    (clicks, views, unique_visitors): (MetricWindow, MetricWindow, MetricWindow),
    breakdowns: Breakdowns,
    trend_series: Vec<TrendPoint>,
    source: MetricsSource,
) -> MetricsReport {
    let conversion_rate = RateWindow::conversion(&clicks, &views);
    let top_countries = top_categories(&breakdowns.country, TOP_COUNTRIES, Some(UNKNOWN));

    MetricsReport {
        time_frame,
        range: ranges.current,
        granularity: time_frame.granularity(),
        overview: MetricsOverview {
            clicks,
            views,
            unique_visitors,
            conversion_rate,
        },
        by_device: breakdowns.device,
        by_browser: breakdowns.browser,
        by_country: breakdowns.country,
        top_countries,
        trend_series,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
    }

    fn ranges() -> WindowRanges {
        WindowRanges::ending_at(now(), TimeFrame::Week.window())
    }

    struct Ev {
        id: i64,
        kind: EventType,
        hours_ago: i64,
        device: Option<&'static str>,
        country: Option<&'static str>,
        visitor: Option<&'static str>,
    }

    fn build(evs: Vec<Ev>) -> Vec<AnalyticsEvent> {
        evs.into_iter()
            .map(|e| AnalyticsEvent {
                id: e.id,
                event_type: e.kind,
                subject_id: "abc".to_string(),
                owner_id: "owner".to_string(),
                device_type: e.device.map(str::to_string),
                browser: Some("Chrome".to_string()),
                country_code: e.country.map(str::to_string),
                visitor_hash: e.visitor.map(str::to_string),
                occurred_at: now() - Duration::hours(e.hours_ago),
                lat: None,
                lng: None,
            })
            .collect()
    }

    fn click(id: i64, hours_ago: i64, device: &'static str, country: &'static str) -> Ev {
        Ev {
            id,
            kind: EventType::Click,
            hours_ago,
            device: Some(device),
            country: Some(country),
            visitor: Some("v1"),
        }
    }

    fn view(id: i64, hours_ago: i64) -> Ev {
        Ev {
            id,
            kind: EventType::View,
            hours_ago,
            device: None,
            country: None,
            visitor: None,
        }
    }

    #[test]
    fn test_report_from_events() {
        let events = build(vec![
            click(1, 1, "iphone", "us"),
            click(2, 2, "windows", "US"),
            click(3, 3, "ipad", "zz"),
            view(4, 4),
            view(5, 5),
            view(6, 6),
            view(7, 7),
            // previous window
            click(8, 24 * 8, "android", "de"),
            view(9, 24 * 9),
        ]);

        let report = report_from_events(TimeFrame::Week, &ranges(), &events);

        assert_eq!(report.source, MetricsSource::RawEvents);
        assert_eq!(report.overview.clicks, MetricWindow::from_totals(3, 1));
        assert_eq!(report.overview.views, MetricWindow::from_totals(4, 1));
        assert_eq!(report.overview.conversion_rate.current, 75.0);
        // v1 plus four anonymous views in the current window.
        assert_eq!(report.overview.unique_visitors.current_total, 5);

        assert_eq!(report.by_device.total, 3);
        assert_eq!(report.by_device.percentage_sum(), 100);
        assert_eq!(report.by_country.get("US").unwrap().count, 2);
        assert_eq!(report.by_country.get(UNKNOWN).unwrap().count, 1);
        assert_eq!(report.top_countries.len(), 1);
        assert_eq!(report.top_countries[0].percentage, 67);

        assert_eq!(report.trend_series.len(), 7);
        assert_eq!(report.trend_series.iter().map(|p| p.clicks).sum::<u64>(), 3);
    }

    #[test]
    fn test_empty_events_give_zeroed_report() {
        let report = report_from_events(TimeFrame::Week, &ranges(), &[]);

        assert_eq!(report.overview.clicks.percent_change, 0.0);
        assert_eq!(report.overview.conversion_rate.current, 0.0);
        assert_eq!(report.by_device.items.len(), 3);
        assert_eq!(report.by_device.percentage_sum(), 0);
        assert!(report.by_country.items.is_empty());
        assert!(report.top_countries.is_empty());
        assert_eq!(report.trend_series.len(), 7);
    }

    #[test]
    fn test_both_paths_agree_on_same_data() {
        let events = build(vec![
            click(1, 1, "iphone", "us"),
            click(2, 30, "windows", "fr"),
            click(3, 50, "ipad", "us"),
        ]);
        let from_events = report_from_events(TimeFrame::Week, &ranges(), &events);

        let aggregate = OverviewAggregate {
            clicks: PeriodTotals {
                current: 3,
                previous: 0,
            },
            views: PeriodTotals::default(),
            unique_visitors: PeriodTotals {
                current: 1,
                previous: 0,
            },
            devices: vec![
                CategoryCount {
                    category: Some("iphone".to_string()),
                    count: 1,
                },
                CategoryCount {
                    category: Some("windows".to_string()),
                    count: 1,
                },
                CategoryCount {
                    category: Some("ipad".to_string()),
                    count: 1,
                },
            ],
            browsers: vec![CategoryCount {
                category: Some("Chrome".to_string()),
                count: 3,
            }],
            countries: vec![
                CategoryCount {
                    category: Some("us".to_string()),
                    count: 2,
                },
                CategoryCount {
                    category: Some("fr".to_string()),
                    count: 1,
                },
            ],
            trend: from_events.trend_series.clone(),
        };
        let from_aggregate = report_from_aggregate(TimeFrame::Week, &ranges(), &aggregate);

        assert_eq!(from_aggregate.source, MetricsSource::Precomputed);
        assert_eq!(from_aggregate.overview, from_events.overview);
        assert_eq!(from_aggregate.by_device, from_events.by_device);
        assert_eq!(from_aggregate.by_browser, from_events.by_browser);
        assert_eq!(from_aggregate.by_country, from_events.by_country);
        assert_eq!(from_aggregate.top_countries, from_events.top_countries);
        assert_eq!(from_aggregate.trend_series, from_events.trend_series);
    }

    #[test]
    fn test_aggregate_categories_merge_after_normalization() {
        let aggregate = OverviewAggregate {
            devices: vec![
                CategoryCount {
                    category: Some("iPhone".to_string()),
                    count: 2,
                },
                CategoryCount {
                    category: Some("Android".to_string()),
                    count: 1,
                },
                CategoryCount {
                    category: None,
                    count: 1,
                },
            ],
            ..OverviewAggregate::default()
        };

        let ranges = WindowRanges::ending_at(now(), TimeFrame::Day.window());
        let report = report_from_aggregate(TimeFrame::Day, &ranges, &aggregate);

        assert_eq!(report.by_device.items[0].category, "mobile");
        assert_eq!(report.by_device.items[0].count, 3);
        assert_eq!(report.by_device.items[0].percentage, 75);
        assert_eq!(report.by_device.get(UNKNOWN).unwrap().percentage, 25);
        assert_eq!(report.trend_series.len(), 24);
    }
}
