//! Direct proxy routes against a mock backend.

mod common;

use axum::{
    body::Bytes,
    extract::Query,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;

use common::{closed_port_url, start_gateway, start_mock_backend};

const HISTORY_BODY: &str = r#"{"zeta":1,"items":[{"score":7.50,"name":"Phỏng vấn"}],"alpha":null}"#;

type JsonReply = (StatusCode, [(&'static str, &'static str); 1], &'static str);

fn json_reply(status: StatusCode, body: &'static str) -> JsonReply {
    (status, [("content-type", "application/json")], body)
}

#[tokio::test]
async fn test_history_body_passes_through_unchanged() {
    let backend = start_mock_backend(Router::new().route(
        "/api/history",
        get(|| async { json_reply(StatusCode::OK, HISTORY_BODY) }),
    ))
    .await;
    let gateway = start_gateway(&backend.url()).await;

    let response = gateway.client.get(gateway.url("/api/history")).send().await.unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), HISTORY_BODY);
    assert_eq!(backend.hits("/api/history"), 1);
}

#[tokio::test]
async fn test_backend_error_status_is_propagated_with_bounded_preview() {
    let backend = start_mock_backend(Router::new().route(
        "/api/results",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "x".repeat(2_000)) }),
    ))
    .await;
    let gateway = start_gateway(&backend.url()).await;

    let response = gateway.client.get(gateway.url("/api/results")).send().await.unwrap();
    assert_eq!(response.status(), 503);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to fetch results");
    assert_eq!(body["status"], 503);
    assert_eq!(body["bodyPreview"].as_str().unwrap().chars().count(), 500);
}

#[tokio::test]
async fn test_not_found_keeps_short_body_whole() {
    let backend = start_mock_backend(Router::new().route(
        "/api/history",
        get(|| async { (StatusCode::NOT_FOUND, "no history yet") }),
    ))
    .await;
    let gateway = start_gateway(&backend.url()).await;

    let response = gateway.client.get(gateway.url("/api/history")).send().await.unwrap();
    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "error": "Failed to fetch history",
            "status": 404,
            "bodyPreview": "no history yet",
        })
    );
}

#[tokio::test]
async fn test_non_json_success_is_bad_gateway() {
    let backend = start_mock_backend(Router::new().route(
        "/api/history",
        get(|| async { "<html>maintenance</html>" }),
    ))
    .await;
    let gateway = start_gateway(&backend.url()).await;

    let response = gateway.client.get(gateway.url("/api/history")).send().await.unwrap();
    assert_eq!(response.status(), 502);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid JSON from backend");
    assert_eq!(body["bodyPreview"], "<html>maintenance</html>");
    assert!(body.get("status").is_none());
}

#[tokio::test]
async fn test_unreachable_backend_is_proxy_error() {
    let gateway = start_gateway(&closed_port_url().await).await;

    for path in ["/api/history", "/api/results", "/api/result-status?log=x.log"] {
        let response = gateway.client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 500, "{path}");

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Proxy error");
        assert!(!body["message"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_result_status_forwards_log_parameter() {
    let backend = start_mock_backend(Router::new().route(
        "/api/result_status",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            Json(json!({ "log": params.get("log"), "done": false }))
        }),
    ))
    .await;
    let gateway = start_gateway(&backend.url()).await;

    let response = gateway
        .client
        .get(gateway.url("/api/result-status"))
        .query(&[("log", "Báo cáo 01.log")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["log"], "Báo cáo 01.log");

    // A missing parameter is forwarded as an empty value.
    let response = gateway.client.get(gateway.url("/api/result-status")).send().await.unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["log"], "");
    assert_eq!(backend.calls().last().map(String::as_str), Some("/api/result_status?log="));
}

#[tokio::test]
async fn test_submit_interview_forwards_body_verbatim() {
    let backend = start_mock_backend(Router::new().route(
        "/submit_interview",
        post(|headers: HeaderMap, body: Bytes| async move {
            let content_type = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({
                "content_type": content_type,
                "echo": String::from_utf8_lossy(&body),
            }))
        }),
    ))
    .await;
    let gateway = start_gateway(&backend.url()).await;

    let payload = r#"{"answers":[{"q":1,"a":"Tôi là sinh viên"}],"type":"job"}"#;
    let response = gateway
        .client
        .post(gateway.url("/api/submit-interview"))
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content_type"], "application/json");
    assert_eq!(body["echo"], payload);
}

#[tokio::test]
async fn test_submit_interview_failure_uses_error_envelope() {
    let backend = start_mock_backend(Router::new().route(
        "/submit_interview",
        post(|| async { (StatusCode::BAD_REQUEST, r#"{"error":"missing answers"}"#) }),
    ))
    .await;
    let gateway = start_gateway(&backend.url()).await;

    let response = gateway
        .client
        .post(gateway.url("/api/submit-interview"))
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to submit interview");
    assert_eq!(body["bodyPreview"], r#"{"error":"missing answers"}"#);
}

#[tokio::test]
async fn test_request_id_reaches_backend_and_client() {
    let backend = start_mock_backend(Router::new().route(
        "/api/history",
        get(|headers: HeaderMap| async move {
            let id = headers
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Json(json!({ "request_id": id }))
        }),
    ))
    .await;
    let gateway = start_gateway(&backend.url()).await;

    let response = gateway
        .client
        .get(gateway.url("/api/history"))
        .header("x-request-id", "trace-123")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-123");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["request_id"], "trace-123");

    // Without an inbound ID one is generated and still forwarded.
    let response = gateway.client.get(gateway.url("/api/history")).send().await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap().to_string();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["request_id"], generated.as_str());
}

#[tokio::test]
async fn test_healthz_reports_backend() {
    let backend = start_mock_backend(Router::new()).await;
    let gateway = start_gateway(&backend.url()).await;

    let response = gateway.client.get(gateway.url("/healthz")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["backend"].as_str().unwrap().starts_with(&backend.url()));
    assert!(backend.calls().is_empty());
}
