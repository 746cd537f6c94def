#[path = "common/mod.rs"]
mod common;

use std::net::SocketAddr;

use common::*;
use draftboard::{app, AppConfig};
use serde_json::{json, Value};

// Serve the router on a real socket so peer addresses come from the
// connection rather than from proxy headers.
async fn serve(config: AppConfig) -> SocketAddr {
    let (state, _clock) = state_with(config);
    let router = app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

#[tokio::test]
async fn peer_address_grants_operator_access() {
    let addr = serve(AppConfig {
        admin_addresses: vec!["127.0.0.1".into()],
        ..test_config()
    })
    .await;
    let client = reqwest::Client::new();

    let check: Value = client
        .get(format!("http://{}/admin/check", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check["isAdmin"], json!(true));

    let resp = client
        .post(format!("http://{}/admin/chat/send", addr))
        .json(&json!({"body": "welcome"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn forwarded_header_takes_precedence_over_peer() {
    let addr = serve(AppConfig {
        admin_addresses: vec!["127.0.0.1".into()],
        ..test_config()
    })
    .await;
    let client = reqwest::Client::new();

    let check: Value = client
        .get(format!("http://{}/admin/check", addr))
        .header("x-forwarded-for", "198.51.100.1, 127.0.0.1")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(check["isAdmin"], json!(false));
}

#[tokio::test]
async fn public_chat_round_trip_over_http() {
    let addr = serve(test_config()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{}/chat/send", addr))
        .json(&json!({"author": "Ann", "body": "gl hf troll"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let listed: Value = client
        .get(format!("http://{}/chat/messages", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["messages"][0]["body"], json!("gl hf *****"));
    assert_eq!(listed["participantCount"], json!(1));
}
