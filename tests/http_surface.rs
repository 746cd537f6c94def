#[path = "common/mod.rs"]
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use draftboard::{app, AppConfig};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // for oneshot

const ROUTES: &[&str] = &[
    "/chat/send",
    "/chat/messages",
    "/chat/direct/send",
    "/chat/direct/messages",
    "/visitors/heartbeat",
    "/visitors/count",
    "/analysis/request",
    "/admin/check",
    "/admin/chat/send",
    "/admin/chat/messages",
    "/admin/chat/read",
    "/healthz",
    "/metrics",
];

#[tokio::test]
async fn options_answers_empty_200_everywhere() {
    let (app, _state, _clock) = test_app();
    for route in ROUTES {
        let req = Request::builder()
            .method("OPTIONS")
            .uri(*route)
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "route {route}");
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty(), "route {route}");
    }
}

#[tokio::test]
async fn browser_preflight_gets_cors_headers() {
    let (app, _state, _clock) = test_app();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/chat/send")
        .header("origin", "https://draft.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn simple_requests_carry_cors_headers() {
    let (app, _state, _clock) = test_app();
    let req = Request::builder()
        .method("GET")
        .uri("/chat/messages")
        .header("origin", "https://draft.example")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn unsupported_methods_are_405_with_json_body() {
    let (app, _state, _clock) = test_app();
    let cases = [
        ("GET", "/chat/send"),
        ("DELETE", "/chat/messages"),
        ("PUT", "/visitors/heartbeat"),
        ("GET", "/analysis/request"),
        ("POST", "/admin/check"),
        ("PATCH", "/admin/chat/read"),
    ];
    for (method, route) in cases {
        let req = Request::builder()
            .method(method)
            .uri(route)
            .body(Body::empty())
            .unwrap();
        let (status, json) = call(&app, req).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method} {route}");
        assert_eq!(json["success"], json!(false));
        assert_eq!(json["error"], json!("METHOD_NOT_ALLOWED"));
    }
}

#[tokio::test]
async fn oversized_body_is_413() {
    let (state, _clock) = state_with(AppConfig {
        max_request_bytes: Some(64),
        ..test_config()
    });
    let app = app(state);
    let body = json!({"author": "Ann", "body": "x".repeat(150)});
    let (status, json) = call(&app, post_json("/chat/send", body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["error"], json!("PAYLOAD_TOO_LARGE"));
}

#[tokio::test]
async fn healthz_reports_store_sizes() {
    let (app, _state, _clock) = test_app();
    call(
        &app,
        post_json("/chat/send", json!({"author": "Ann", "body": "hello"})),
    )
    .await;
    call(&app, post_json("/visitors/heartbeat", json!({"sessionId": "s1"}))).await;
    let (status, json) = call(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], json!("ok"));
    assert_eq!(json["publicMessages"], json!(1));
    assert_eq!(json["directMessages"], json!(0));
    assert_eq!(json["visitorCount"], json!(1));
}

#[tokio::test]
async fn metrics_expose_counters_and_gauges() {
    let (app, _state, _clock) = test_app();
    call(
        &app,
        post_json("/chat/send", json!({"author": "Ann", "body": "hello"})),
    )
    .await;
    call(
        &app,
        post_json("/chat/send", json!({"author": "Ann", "body": "again"})),
    )
    .await;
    call(&app, post_json("/chat/send", json!({"author": "", "body": "x"}))).await;
    call(&app, post_json("/visitors/heartbeat", json!({"sessionId": "s1"}))).await;

    let resp = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("draftboard_public_messages_total 1"));
    assert!(text.contains("draftboard_rate_limited_total 1"));
    assert!(text.contains("draftboard_validation_rejections_total 1"));
    assert!(text.contains("draftboard_heartbeats_total 1"));
    assert!(text.contains("draftboard_active_visitors 1"));
    assert!(text.contains("draftboard_chat_messages_retained{store=\"public\"} 1"));
    assert!(text.contains("draftboard_analysis_errors_total{code=\"TIMEOUT\"} 0"));
    let help_occurrences = text
        .matches("# HELP draftboard_analysis_errors_total")
        .count();
    assert_eq!(help_occurrences, 1);
}
