mod common;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = common::test_app();

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let app = common::test_app();

    let json = app.server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"].get("cache").is_some());
}

#[tokio::test]
async fn test_ping() {
    let app = common::test_app();

    let response = app.server.get("/ping").await;

    response.assert_status_ok();
    response.assert_json(&serde_json::json!({ "message": "pong" }));
}
