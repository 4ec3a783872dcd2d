//! Fixed-grid trend series over the current window.

use chrono::{DateTime, Utc};

use crate::domain::entities::{AnalyticsEvent, EventType, TimeRange, TrendGranularity, TrendPoint};

/// Bucket start times covering `range`, stepping by `granularity` from
/// `range.start`.
///
/// A trailing partial step still gets its own bucket.
pub fn bucket_starts(range: &TimeRange, granularity: TrendGranularity) -> Vec<DateTime<Utc>> {
    let step = granularity.step();
    let mut starts = Vec::new();
    let mut cursor = range.start;

    while cursor < range.end {
        starts.push(cursor);
        cursor += step;
    }

    starts
}

fn empty_series(range: &TimeRange, granularity: TrendGranularity) -> Vec<TrendPoint> {
    bucket_starts(range, granularity)
        .into_iter()
        .map(|bucket_start| TrendPoint {
            bucket_start,
            clicks: 0,
            views: 0,
        })
        .collect()
}

fn bucket_index(
    at: DateTime<Utc>,
    range: &TimeRange,
    granularity: TrendGranularity,
) -> Option<usize> {
    if !range.contains(at) {
        return None;
    }

    let step = granularity.step().num_seconds();
    let offset = (at - range.start).num_seconds();
    usize::try_from(offset / step).ok()
}

/// Buckets click and view events into a zero-filled series.
///
/// Events outside `range` are ignored.
pub fn bucket_events(
    events: &[AnalyticsEvent],
    range: &TimeRange,
    granularity: TrendGranularity,
) -> Vec<TrendPoint> {
    let mut series = empty_series(range, granularity);

    for event in events {
        let Some(point) =
            bucket_index(event.occurred_at, range, granularity).and_then(|i| series.get_mut(i))
        else {
            continue;
        };

        match event.event_type {
            EventType::Click => point.clicks += 1,
            EventType::View => point.views += 1,
        }
    }

    series
}

/// Re-buckets externally computed points onto the same grid as
/// [`bucket_events`].
///
/// Points that share a bucket are summed; points outside `range` are dropped.
/// This keeps the precomputed path's output identical in shape to the raw
/// path even if the store buckets on calendar boundaries.
pub fn regrid(
    points: &[TrendPoint],
    range: &TimeRange,
    granularity: TrendGranularity,
) -> Vec<TrendPoint> {
    let mut series = empty_series(range, granularity);

    for point in points {
        if let Some(slot) =
            bucket_index(point.bucket_start, range, granularity).and_then(|i| series.get_mut(i))
        {
            slot.clicks += point.clicks;
            slot.views += point.views;
        }
    }

    series
}
