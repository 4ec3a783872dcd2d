mod common;

use axum::http::StatusCode;
use common::{BASE_URL, OTHER_OWNER, OWNER};
use linkfolio::domain::repositories::LinkRepository;
use serde_json::{Value, json};

// ─── POST /api/links ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_with_generated_code() {
    let (server, _store) = common::create_test_server();

    let response = server
        .post("/api/links")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "target_url": "https://Example.com:443/landing" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<Value>();
    let code = body["code"].as_str().unwrap();
    assert!(code.len() >= 6);
    assert_eq!(body["short_url"], format!("{BASE_URL}/{code}"));
    assert_eq!(body["target_url"], "https://example.com/landing");
    assert_eq!(body["title"], "example.com");
    assert_eq!(body["active"], true);
    assert_eq!(body["click_count"], 0);
}

#[tokio::test]
async fn test_create_link_with_custom_code() {
    let (server, store) = common::create_test_server();

    let response = server
        .post("/api/links")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({
            "target_url": "https://example.com",
            "custom_code": "Spring-Sale",
            "title": "  Spring sale  "
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "Spring-Sale");
    assert_eq!(body["title"], "Spring sale");

    let stored = store.find_by_code("Spring-Sale").await.unwrap().unwrap();
    assert_eq!(stored.owner_id, OWNER);
}

#[tokio::test]
async fn test_create_link_custom_code_taken() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "taken", OTHER_OWNER).await;

    let response = server
        .post("/api/links")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "target_url": "https://example.com", "custom_code": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "code_taken");
    assert_eq!(body["error"]["message"], "This code is already taken");
}

#[tokio::test]
async fn test_create_link_invalid_custom_code() {
    let (server, store) = common::create_test_server();

    let response = server
        .post("/api/links")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "target_url": "https://example.com", "custom_code": "my--link" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(body["error"]["details"]["reason"], "consecutive_hyphens");
    assert!(store.list_by_owner(OWNER).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_link_reserved_code() {
    let (server, _store) = common::create_test_server();

    let response = server
        .post("/api/links")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "target_url": "https://example.com", "custom_code": "Admin" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["message"], "This code is reserved");
}

#[tokio::test]
async fn test_create_link_relative_url() {
    let (server, _store) = common::create_test_server();

    let response = server
        .post("/api/links")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "target_url": "example.com/landing" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_url");
}

#[tokio::test]
async fn test_create_link_invalid_url() {
    let (server, _store) = common::create_test_server();

    let response = server
        .post("/api/links")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "target_url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_url");
}

#[tokio::test]
async fn test_create_link_requires_owner_header() {
    let (server, _store) = common::create_test_server();

    let response = server
        .post("/api/links")
        .json(&json!({ "target_url": "https://example.com" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["error"]["code"], "invalid_request");
}

// ─── GET /api/links ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_only_returns_own_links() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "first", OWNER).await;
    common::create_test_link(&store, "foreign", OTHER_OWNER).await;
    common::create_test_link(&store, "second", OWNER).await;

    let response = server.get("/api/links").add_header("X-Owner-Id", OWNER).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["code"], "second");
    assert_eq!(body["items"][1]["code"], "first");
}

// ─── GET /api/links/availability/{code} ──────────────────────────────────────

#[tokio::test]
async fn test_availability() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "gone-link", OWNER).await;
    store.deactivate("gone-link", OWNER).await.unwrap();

    let free = server.get("/api/links/availability/fresh-code").await;
    free.assert_status_ok();
    assert_eq!(free.json::<Value>()["available"], true);

    // Deactivated codes are never handed out again.
    let taken = server.get("/api/links/availability/gone-link").await;
    let body = taken.json::<Value>();
    assert_eq!(body["available"], false);
    assert_eq!(body["reason"], "This code is already taken");

    let invalid = server.get("/api/links/availability/ab").await;
    let body = invalid.json::<Value>();
    assert_eq!(body["available"], false);
    assert_eq!(body["reason"], "Custom code must be at least 3 characters");
}

// ─── PATCH /api/links/{code} ─────────────────────────────────────────────────

#[tokio::test]
async fn test_update_link() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "upd001", OWNER).await;

    let response = server
        .patch("/api/links/upd001")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({
            "target_url": "https://new.example.org",
            "title": "New",
            "expires_at": "2099-01-01T00:00:00Z"
        }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["target_url"], "https://new.example.org/");
    assert_eq!(body["title"], "New");
    assert_eq!(body["expires_at"], "2099-01-01T00:00:00Z");

    let cleared = server
        .patch("/api/links/upd001")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "expires_at": null }))
        .await;

    cleared.assert_status_ok();
    assert_eq!(cleared.json::<Value>()["expires_at"], Value::Null);
}

#[tokio::test]
async fn test_update_link_past_expiry_rejected() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "upd003", OWNER).await;

    let response = server
        .patch("/api/links/upd003")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "expires_at": "2001-01-01T00:00:00Z" }))
        .await;

    response.assert_status_bad_request();

    let link = store.find_by_code("upd003").await.unwrap().unwrap();
    assert_eq!(link.expires_at, None);
}

#[tokio::test]
async fn test_update_link_of_other_owner_is_forbidden() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "upd002", OTHER_OWNER).await;

    let response = server
        .patch("/api/links/upd002")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "title": "Mine now" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let stored = store.find_by_code("upd002").await.unwrap().unwrap();
    assert_eq!(stored.title, "example.com");
}

#[tokio::test]
async fn test_update_link_not_found() {
    let (server, _store) = common::create_test_server();

    let response = server
        .patch("/api/links/nonexistent")
        .add_header("X-Owner-Id", OWNER)
        .json(&json!({ "title": "x" }))
        .await;

    response.assert_status_not_found();
}

// ─── DELETE /api/links/{code} ────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_link_twice() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "del001", OWNER).await;

    server
        .delete("/api/links/del001")
        .add_header("X-Owner-Id", OWNER)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    // Second delete returns 404, already inactive.
    server
        .delete("/api/links/del001")
        .add_header("X-Owner-Id", OWNER)
        .await
        .assert_status_not_found();

    let stored = store.find_by_code("del001").await.unwrap().unwrap();
    assert!(!stored.active);
}

#[tokio::test]
async fn test_delete_link_of_other_owner_is_forbidden() {
    let (server, store) = common::create_test_server();
    common::create_test_link(&store, "del002", OTHER_OWNER).await;

    server
        .delete("/api/links/del002")
        .add_header("X-Owner-Id", OWNER)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    assert!(store.find_by_code("del002").await.unwrap().unwrap().active);
}
