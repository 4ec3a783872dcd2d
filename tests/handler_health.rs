mod common;

use serde_json::Value;

#[tokio::test]
async fn test_health_reports_storage() {
    let (server, _store) = common::create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["status"], "ok");
    assert_eq!(body["checks"]["storage"]["message"], "memory");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
