//! PostgreSQL implementation of event repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{
    AnalyticsEvent, EventType, NewAnalyticsEvent, OverviewAggregate, TrendGranularity,
    WindowRanges,
};
use crate::domain::repositories::{EventQuery, EventRepository};
use crate::error::AppError;

const EVENT_COLUMNS: &str = "id, event_type, subject_id, owner_id, device_type, browser, \
     country_code, visitor_hash, occurred_at, lat, lng";

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    event_type: String,
    subject_id: String,
    owner_id: String,
    device_type: Option<String>,
    browser: Option<String>,
    country_code: Option<String>,
    visitor_hash: Option<String>,
    occurred_at: DateTime<Utc>,
    lat: Option<f64>,
    lng: Option<f64>,
}

impl TryFrom<EventRow> for AnalyticsEvent {
    type Error = AppError;

    fn try_from(r: EventRow) -> Result<Self, Self::Error> {
        let event_type = EventType::parse(&r.event_type)
            .ok_or_else(|| AppError::internal(format!("Unknown event type '{}'", r.event_type)))?;

        Ok(AnalyticsEvent {
            id: r.id,
            event_type,
            subject_id: r.subject_id,
            owner_id: r.owner_id,
            device_type: r.device_type,
            browser: r.browser,
            country_code: r.country_code,
            visitor_hash: r.visitor_hash,
            occurred_at: r.occurred_at,
            lat: r.lat,
            lng: r.lng,
        })
    }
}

/// PostgreSQL repository for analytics events.
///
/// The precomputed path calls the `analytics_overview` SQL function, which
/// rolls up both windows server-side and returns JSON.
pub struct PgEventRepository {
    pool: Arc<PgPool>,
}

impl PgEventRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn record(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent, AppError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO analytics_events
                (event_type, subject_id, owner_id, device_type, browser,
                 country_code, visitor_hash, occurred_at, lat, lng)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.event_type.as_str())
        .bind(event.subject_id)
        .bind(event.owner_id)
        .bind(event.device_type)
        .bind(event.browser)
        .bind(event.country_code)
        .bind(event.visitor_hash)
        .bind(event.occurred_at)
        .bind(event.lat)
        .bind(event.lng)
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn query_events(&self, query: &EventQuery) -> Result<Vec<AnalyticsEvent>, AppError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM analytics_events
            WHERE owner_id = $1
              AND ($2::text IS NULL OR subject_id = $2)
              AND occurred_at >= $3
              AND occurred_at < $4
            ORDER BY occurred_at
            "#
        ))
        .bind(&query.owner_id)
        .bind(query.subject_id.as_deref())
        .bind(query.range.start)
        .bind(query.range.end)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(AnalyticsEvent::try_from).collect()
    }

    async fn precomputed_overview(
        &self,
        owner_id: &str,
        ranges: &WindowRanges,
        granularity: TrendGranularity,
    ) -> Result<Option<OverviewAggregate>, AppError> {
        let value: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT analytics_overview($1, $2, $3, $4, $5)")
                .bind(owner_id)
                .bind(ranges.previous.start)
                .bind(ranges.current.start)
                .bind(ranges.current.end)
                .bind(granularity.step().num_seconds() as f64)
                .fetch_one(self.pool.as_ref())
                .await
                .map_err(|e| AppError::AggregationSourceUnavailable(e.to_string()))?;

        value
            .map(serde_json::from_value::<OverviewAggregate>)
            .transpose()
            .map_err(|e| AppError::AggregationSourceUnavailable(e.to_string()))
    }
}
