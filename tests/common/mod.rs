#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, routing::get};
use axum_test::TestServer;
use chrono::{DateTime, Duration, Utc};
use linkfolio::api::handlers::{health_handler, redirect_handler};
use linkfolio::api::routes::api_routes;
use linkfolio::domain::entities::{AnalyticsEvent, EventType, NewShortLink, ShortLink};
use linkfolio::domain::repositories::LinkRepository;
use linkfolio::infrastructure::persistence::InMemoryStore;
use linkfolio::state::AppState;
use linkfolio::utils::visitor_hash::VisitorHasher;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tower::Layer;

pub const OWNER: &str = "owner-1";
pub const OTHER_OWNER: &str = "owner-2";
pub const BASE_URL: &str = "https://lnk.test";
pub const HASH_SECRET: &str = "test-visitor-secret";

/// Inserts a fixed peer address the way `into_make_service_with_connect_info` would.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn create_test_state() -> (AppState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::in_memory(store.clone(), VisitorHasher::new(HASH_SECRET), BASE_URL);
    (state, store)
}

/// Full route table on top of a fresh in-memory store.
pub fn create_test_server() -> (TestServer, Arc<InMemoryStore>) {
    let (state, store) = create_test_state();

    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .layer(MockConnectInfoLayer)
        .with_state(state);

    (TestServer::new(app).unwrap(), store)
}

pub async fn create_test_link(store: &InMemoryStore, code: &str, owner: &str) -> ShortLink {
    store
        .insert(NewShortLink {
            code: code.to_string(),
            target_url: format!("https://example.com/{code}"),
            owner_id: owner.to_string(),
            title: "example.com".to_string(),
            expires_at: None,
        })
        .await
        .unwrap()
}

pub async fn create_expired_link(store: &InMemoryStore, code: &str, owner: &str) -> ShortLink {
    store
        .insert(NewShortLink {
            code: code.to_string(),
            target_url: format!("https://example.com/{code}"),
            owner_id: owner.to_string(),
            title: "example.com".to_string(),
            expires_at: Some(Utc::now() - Duration::hours(1)),
        })
        .await
        .unwrap()
}

static NEXT_EVENT_ID: AtomicI64 = AtomicI64::new(1_000);

/// Builder for historical events imported straight into the store.
pub struct EventBuilder {
    event: AnalyticsEvent,
}

impl EventBuilder {
    pub fn click(owner: &str, subject: &str) -> Self {
        Self::new(EventType::Click, owner, subject)
    }

    pub fn view(owner: &str, subject: &str) -> Self {
        Self::new(EventType::View, owner, subject)
    }

    fn new(event_type: EventType, owner: &str, subject: &str) -> Self {
        Self {
            event: AnalyticsEvent {
                id: NEXT_EVENT_ID.fetch_add(1, Ordering::Relaxed),
                event_type,
                subject_id: subject.to_string(),
                owner_id: owner.to_string(),
                device_type: None,
                browser: None,
                country_code: None,
                visitor_hash: None,
                occurred_at: Utc::now() - Duration::minutes(5),
                lat: None,
                lng: None,
            },
        }
    }

    pub fn device(mut self, device: &str) -> Self {
        self.event.device_type = Some(device.to_string());
        self
    }

    pub fn browser(mut self, browser: &str) -> Self {
        self.event.browser = Some(browser.to_string());
        self
    }

    pub fn country(mut self, country: &str) -> Self {
        self.event.country_code = Some(country.to_string());
        self
    }

    pub fn visitor(mut self, hash: &str) -> Self {
        self.event.visitor_hash = Some(hash.to_string());
        self
    }

    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.event.occurred_at = occurred_at;
        self
    }

    pub fn ago(self, age: Duration) -> Self {
        self.at(Utc::now() - age)
    }

    pub async fn import(self, store: &InMemoryStore) {
        store.import_event(self.event).await;
    }
}
