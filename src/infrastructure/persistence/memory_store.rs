//! Process-local implementation of both repository traits.
//!
//! Used when no database is configured, and by integration tests. Data is
//! lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{
    AnalyticsEvent, LinkPatch, NewAnalyticsEvent, NewShortLink, OverviewAggregate, ShortLink,
    TrendGranularity, WindowRanges,
};
use crate::domain::repositories::{EventQuery, EventRepository, LinkRepository};
use crate::error::AppError;

#[derive(Default)]
struct LinkTable {
    rows: Vec<ShortLink>,
    by_code: HashMap<String, usize>,
}

impl LinkTable {
    fn get(&self, code: &str) -> Option<&ShortLink> {
        let index = *self.by_code.get(code)?;
        self.rows.get(index)
    }

    fn get_mut(&mut self, code: &str) -> Option<&mut ShortLink> {
        let index = *self.by_code.get(code)?;
        self.rows.get_mut(index)
    }
}

#[derive(Default)]
struct EventLog {
    rows: Vec<AnalyticsEvent>,
    /// Highest id handed out or imported so far.
    last_id: i64,
}

impl EventLog {
    fn push(&mut self, event: AnalyticsEvent) {
        self.last_id = self.last_id.max(event.id);
        self.rows.push(event);
    }
}

/// In-memory link and event store.
///
/// The existence check and the insert of [`LinkRepository::insert`] happen
/// under one write lock, so of two concurrent inserts of the same code
/// exactly one succeeds. There is no precomputed rollup source;
/// [`EventRepository::precomputed_overview`] always reports no data.
#[derive(Default)]
pub struct InMemoryStore {
    links: RwLock<LinkTable>,
    events: RwLock<EventLog>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an already stored event as-is, keeping its id and timestamp.
    ///
    /// Intended for seeding historical data.
    pub async fn import_event(&self, event: AnalyticsEvent) {
        self.events.write().await.push(event);
    }

    /// Number of stored events.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.rows.len()
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.read().await.get(code).cloned())
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut table = self.links.write().await;

        if table.by_code.contains_key(&new_link.code) {
            return Err(AppError::code_taken(new_link.code));
        }

        let link = ShortLink {
            code: new_link.code,
            target_url: new_link.target_url,
            owner_id: new_link.owner_id,
            title: new_link.title,
            created_at: Utc::now(),
            expires_at: new_link.expires_at,
            active: true,
            click_count: 0,
        };

        let index = table.rows.len();
        table.by_code.insert(link.code.clone(), index);
        table.rows.push(link.clone());

        Ok(link)
    }

    async fn update(
        &self,
        code: &str,
        owner_id: &str,
        patch: LinkPatch,
    ) -> Result<ShortLink, AppError> {
        let mut table = self.links.write().await;

        match table.get_mut(code) {
            Some(link) if link.active && link.is_owned_by(owner_id) => {
                patch.apply_to(link);
                Ok(link.clone())
            }
            _ => Err(AppError::not_found("Short link not found")),
        }
    }

    async fn deactivate(&self, code: &str, owner_id: &str) -> Result<bool, AppError> {
        let mut table = self.links.write().await;

        match table.get_mut(code) {
            Some(link) if link.active && link.is_owned_by(owner_id) => {
                link.active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn increment_click_count(&self, code: &str) -> Result<(), AppError> {
        let mut table = self.links.write().await;

        if let Some(link) = table.get_mut(code)
            && link.active
        {
            link.click_count += 1;
        }
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let table = self.links.read().await;

        // Rows are in insertion order; reverse for newest first.
        Ok(table
            .rows
            .iter()
            .rev()
            .filter(|link| link.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn record(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent, AppError> {
        let mut log = self.events.write().await;

        let stored = AnalyticsEvent {
            id: log.last_id + 1,
            event_type: event.event_type,
            subject_id: event.subject_id,
            owner_id: event.owner_id,
            device_type: event.device_type,
            browser: event.browser,
            country_code: event.country_code,
            visitor_hash: event.visitor_hash,
            occurred_at: event.occurred_at,
            lat: event.lat,
            lng: event.lng,
        };
        log.push(stored.clone());

        Ok(stored)
    }

    async fn query_events(&self, query: &EventQuery) -> Result<Vec<AnalyticsEvent>, AppError> {
        let log = self.events.read().await;

        let mut matching: Vec<AnalyticsEvent> = log
            .rows
            .iter()
            .filter(|e| e.owner_id == query.owner_id)
            .filter(|e| {
                query
                    .subject_id
                    .as_deref()
                    .is_none_or(|subject| e.subject_id == subject)
            })
            .filter(|e| query.range.contains(e.occurred_at))
            .cloned()
            .collect();
        matching.sort_by_key(|e| e.occurred_at);

        Ok(matching)
    }

    async fn precomputed_overview(
        &self,
        _owner_id: &str,
        _ranges: &WindowRanges,
        _granularity: TrendGranularity,
    ) -> Result<Option<OverviewAggregate>, AppError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EventType, TimeRange};
    use chrono::Duration;
    use std::sync::Arc;

    fn new_link(code: &str, owner: &str) -> NewShortLink {
        NewShortLink {
            code: code.to_string(),
            target_url: "https://example.com/".to_string(),
            owner_id: owner.to_string(),
            title: "example.com".to_string(),
            expires_at: None,
        }
    }

    fn new_event(owner: &str, subject: &str, minutes_ago: i64) -> NewAnalyticsEvent {
        NewAnalyticsEvent {
            event_type: EventType::Click,
            subject_id: subject.to_string(),
            owner_id: owner.to_string(),
            device_type: None,
            browser: None,
            country_code: None,
            visitor_hash: None,
            occurred_at: Utc::now() - Duration::minutes(minutes_ago),
            lat: None,
            lng: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryStore::new();
        store.insert(new_link("abc123", "o1")).await.unwrap();

        let found = store.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found.owner_id, "o1");
        assert!(found.active);
        assert!(store.find_by_code("ABC123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_code_taken_even_when_inactive() {
        let store = InMemoryStore::new();
        store.insert(new_link("promo", "o1")).await.unwrap();
        assert!(store.deactivate("promo", "o1").await.unwrap());

        let result = store.insert(new_link("promo", "o2")).await;

        assert!(matches!(result, Err(AppError::CodeTaken { .. })));
        assert!(store.find_by_code("promo").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_inserts_exactly_one_wins() {
        let store = Arc::new(InMemoryStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(new_link("race", &format!("o{i}"))).await })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }

        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn test_update_and_deactivate_check_owner() {
        let store = InMemoryStore::new();
        store.insert(new_link("mine", "o1")).await.unwrap();

        let patch = LinkPatch {
            title: Some("Renamed".to_string()),
            ..LinkPatch::default()
        };
        assert!(store.update("mine", "o2", patch.clone()).await.is_err());
        assert!(!store.deactivate("mine", "o2").await.unwrap());

        let updated = store.update("mine", "o1", patch).await.unwrap();
        assert_eq!(updated.title, "Renamed");
    }

    #[tokio::test]
    async fn test_click_count_only_moves_while_active() {
        let store = InMemoryStore::new();
        store.insert(new_link("cnt", "o1")).await.unwrap();

        store.increment_click_count("cnt").await.unwrap();
        store.deactivate("cnt", "o1").await.unwrap();
        store.increment_click_count("cnt").await.unwrap();

        assert_eq!(store.find_by_code("cnt").await.unwrap().unwrap().click_count, 1);
    }

    #[tokio::test]
    async fn test_list_by_owner_newest_first() {
        let store = InMemoryStore::new();
        store.insert(new_link("first", "o1")).await.unwrap();
        store.insert(new_link("other", "o2")).await.unwrap();
        store.insert(new_link("second", "o1")).await.unwrap();

        let codes: Vec<String> = store
            .list_by_owner("o1")
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();

        assert_eq!(codes, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_query_events_filters() {
        let store = InMemoryStore::new();
        store.record(new_event("o1", "a", 5)).await.unwrap();
        store.record(new_event("o1", "b", 5)).await.unwrap();
        store.record(new_event("o2", "a", 5)).await.unwrap();
        store.record(new_event("o1", "a", 120)).await.unwrap();

        let range = TimeRange::new(Utc::now() - Duration::hours(1), Utc::now() + Duration::minutes(1));

        let all = store.query_events(&EventQuery::new("o1", range)).await.unwrap();
        let only_a = store
            .query_events(&EventQuery::new("o1", range).with_subject(Some("a".to_string())))
            .await
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(only_a.len(), 1);
        assert_eq!(store.event_count().await, 4);
    }

    #[tokio::test]
    async fn test_event_ids_are_sequential() {
        let store = InMemoryStore::new();
        let a = store.record(new_event("o1", "a", 0)).await.unwrap();
        let b = store.record(new_event("o1", "a", 0)).await.unwrap();

        assert_eq!(b.id, a.id + 1);
    }

    #[tokio::test]
    async fn test_recorded_ids_continue_after_imports() {
        let store = InMemoryStore::new();
        let first = store.record(new_event("o1", "a", 0)).await.unwrap();

        let mut imported = first.clone();
        imported.id = 41;
        store.import_event(imported).await;

        let next = store.record(new_event("o1", "a", 0)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(next.id, 42);
    }
}
