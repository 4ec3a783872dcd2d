mod common;

use axum::http::StatusCode;
use common::OWNER;
use linkfolio::domain::entities::{EventType, TimeRange};
use linkfolio::domain::repositories::{EventQuery, EventRepository, LinkRepository};
use chrono::{Duration, Utc};

fn last_hour() -> TimeRange {
    TimeRange::new(Utc::now() - Duration::hours(1), Utc::now() + Duration::minutes(1))
}

#[tokio::test]
async fn test_redirect_success() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "abc123", OWNER).await;

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/abc123");
}

#[tokio::test]
async fn test_redirect_records_click() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "trk001", OWNER).await;

    server
        .get("/trk001")
        .add_header("User-Agent", "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0) Mobile Safari")
        .add_header("X-Forwarded-For", "203.0.113.9, 10.0.0.1")
        .add_header("CF-IPCountry", "de")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);

    let events = store
        .query_events(&EventQuery::new(OWNER, last_hour()))
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.event_type, EventType::Click);
    assert_eq!(event.subject_id, "trk001");
    assert_eq!(event.country_code.as_deref(), Some("de"));

    // Only the keyed hash of the client IP is stored.
    let hash = event.visitor_hash.as_deref().unwrap();
    assert_eq!(hash.len(), 64);
    assert!(!hash.contains("203.0.113.9"));

    let link = store.find_by_code("trk001").await.unwrap().unwrap();
    assert_eq!(link.click_count, 1);
}

#[tokio::test]
async fn test_same_client_hashes_identically() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "trk002", OWNER).await;

    server.get("/trk002").await;
    server.get("/trk002").await;

    let events = store
        .query_events(&EventQuery::new(OWNER, last_hour()))
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].visitor_hash, events[1].visitor_hash);
    assert!(events[0].visitor_hash.is_some());
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (server, store) = common::create_test_server();

    let response = server.get("/nonexistent").await;

    response.assert_status_not_found();
    assert_eq!(store.event_count().await, 0);
}

#[tokio::test]
async fn test_redirect_deleted_link_is_gone() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "deleted1", OWNER).await;
    store.deactivate("deleted1", OWNER).await.unwrap();

    let response = server.get("/deleted1").await;

    response.assert_status(StatusCode::GONE);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "inactive"
    );
    assert_eq!(store.event_count().await, 0);
}

#[tokio::test]
async fn test_redirect_expired_link_is_gone() {
    let (server, store) = common::create_test_server();
    common::create_expired_link(&store, "expired1", OWNER).await;

    let response = server.get("/expired1").await;

    response.assert_status(StatusCode::GONE);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "expired"
    );

    let link = store.find_by_code("expired1").await.unwrap().unwrap();
    assert_eq!(link.click_count, 0);
}

#[tokio::test]
async fn test_redirect_codes_are_case_sensitive() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "CaseCode", OWNER).await;

    server.get("/CaseCode").await.assert_status(StatusCode::TEMPORARY_REDIRECT);
    server.get("/casecode").await.assert_status_not_found();
}
