mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

const LINKS: &str = "/api/v1/shortener-link";

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_link_with_generated_code() {
    let app = common::test_app();

    let response = app
        .server
        .post(LINKS)
        .json(&json!({ "original_url": "https://example.com/some/long/path" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();

    assert_eq!(body["status"], true);
    let data = &body["data"];
    let code = data["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(data["original_url"], "https://example.com/some/long/path");
    assert_eq!(
        data["short_url"],
        format!("{}/{}", common::BASE_URL, code)
    );
    assert_eq!(app.links.len(), 1);
}

#[tokio::test]
async fn test_create_link_with_custom_code() {
    let app = common::test_app();

    let response = app
        .server
        .post(LINKS)
        .json(&json!({ "original_url": "https://example.com", "short_code": "my-link" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["short_code"], "my-link");
}

#[tokio::test]
async fn test_create_link_custom_code_conflict() {
    let app = common::test_app();
    app.seed_link("taken", "https://other.com", 5);

    let response = app
        .server
        .post(LINKS)
        .json(&json!({ "original_url": "https://example.com", "short_code": "taken" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["status"], false);
    assert_eq!(body["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_create_link_rejects_invalid_url() {
    let app = common::test_app();

    for url in ["not-a-url", "ftp://example.com/file", "javascript:alert(1)"] {
        let response = app
            .server
            .post(LINKS)
            .json(&json!({ "original_url": url }))
            .await;

        response.assert_status_bad_request();
    }
    assert_eq!(app.links.len(), 0);
}

#[tokio::test]
async fn test_create_link_rejects_reserved_code() {
    let app = common::test_app();

    let response = app
        .server
        .post(LINKS)
        .json(&json!({ "original_url": "https://example.com", "short_code": "API" }))
        .await;

    response.assert_status_bad_request();
}

// ─── REDIRECT ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_redirect_is_permanent() {
    let app = common::test_app();
    app.seed_link("abc123", "https://example.com/target?x=1", 1);

    let response = app.server.get(&format!("{LINKS}/abc123")).await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.header("location"),
        "https://example.com/target?x=1"
    );
}

#[tokio::test]
async fn test_redirect_unknown_code() {
    let app = common::test_app();

    let response = app.server.get(&format!("{LINKS}/nope42")).await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_created_link_resolves() {
    let app = common::test_app();

    let created = app
        .server
        .post(LINKS)
        .json(&json!({ "original_url": "https://rust-lang.org" }))
        .await
        .json::<Value>();
    let code = created["data"]["short_code"].as_str().unwrap().to_string();

    let response = app.server.get(&format!("{LINKS}/{code}")).await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header("location"), "https://rust-lang.org");
}

// ─── LIST ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_links_paginates() {
    let app = common::test_app();
    for i in 0..25 {
        app.seed_link(&format!("code{i:02}"), &format!("https://example.com/{i}"), 100 - i);
    }

    let response = app
        .server
        .get(LINKS)
        .add_query_param("page", "3")
        .add_query_param("page_size", "10")
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();

    assert_eq!(
        body["meta"],
        json!({ "page": 3, "page_size": 10, "total_rows": 25, "total_pages": 3 })
    );
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["short_code"], "code20");
}

#[tokio::test]
async fn test_list_links_default_order_is_oldest_first() {
    let app = common::test_app();
    app.seed_link("newest", "https://example.com/new", 1);
    app.seed_link("oldest", "https://example.com/old", 60);

    let body = app.server.get(LINKS).await.json::<Value>();

    assert_eq!(body["data"][0]["short_code"], "oldest");
    assert_eq!(body["data"][1]["short_code"], "newest");
    assert_eq!(body["meta"]["page_size"], 10);
}

#[tokio::test]
async fn test_list_links_search_and_sort_desc() {
    let app = common::test_app();
    app.seed_link("docs1", "https://docs.rs/axum", 30);
    app.seed_link("docs2", "https://DOCS.rs/tokio", 10);
    app.seed_link("other", "https://example.com", 20);

    let body = app
        .server
        .get(LINKS)
        .add_query_param("search", "docs")
        .add_query_param("order_by", "created_at")
        .add_query_param("order_dir", "DESC")
        .await
        .json::<Value>();

    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["short_code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["docs2", "docs1"]);
    assert_eq!(body["meta"]["total_rows"], 2);
}

#[tokio::test]
async fn test_list_links_equality_filter() {
    let app = common::test_app();
    app.seed_link("alpha", "https://example.com/a", 3);
    app.seed_link("beta", "https://example.com/b", 2);

    let body = app
        .server
        .get(LINKS)
        .add_query_param("short_code", "beta")
        .await
        .json::<Value>();

    assert_eq!(body["meta"]["total_rows"], 1);
    assert_eq!(body["data"][0]["original_url"], "https://example.com/b");
}

#[tokio::test]
async fn test_list_links_page_past_end_is_empty() {
    let app = common::test_app();
    app.seed_link("only1", "https://example.com", 1);

    let body = app
        .server
        .get(LINKS)
        .add_query_param("page", "5")
        .await
        .json::<Value>();

    assert_eq!(body["data"], json!([]));
    assert_eq!(body["meta"]["total_rows"], 1);
    assert_eq!(body["meta"]["total_pages"], 1);
}

#[tokio::test]
async fn test_list_links_validation_errors() {
    let app = common::test_app();

    let cases = [
        ("search", "drop table;", "Search query contains invalid characters"),
        ("order_by", "password", "invalid order by column: password"),
        ("order_dir", "sideways", "invalid order direction: must be 'ASC' or 'DESC'"),
        ("page", "0", "page must be greater than 0"),
        ("page_size", "1000", "page size must be less than or equal to 100"),
        ("unknown", "x", "invalid filter key: unknown"),
    ];

    for (key, value, message) in cases {
        let response = app
            .server
            .get(LINKS)
            .add_query_param(key, value)
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["status"], false, "{key}={value}");
        assert_eq!(body["message"], message, "{key}={value}");
    }
}
