//! Relay client against a live forwarding server and webhook.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use beacon_core::{BeaconConfig, SessionId};
use beacon_relay::{ChatSession, HttpTransport, RelayClient, RelayEndpoints, RelayOutcome};
use beacon_server::{build_router, AppState};

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Webhook answering `{"output": "echo: <chatInput>"}`.
async fn spawn_webhook() -> SocketAddr {
    let app = Router::new().route(
        "/webhook",
        post(|Json(body): Json<Value>| async move {
            let input = body["chatInput"].as_str().unwrap_or_default().to_string();
            Json(json!({ "output": format!("echo: {input}") }))
        }),
    );
    serve(app).await
}

async fn spawn_proxy(webhook_url: String) -> SocketAddr {
    let config = BeaconConfig::from_lookup(move |key| match key {
        "N8N_WEBHOOK_URL" => Some(webhook_url.clone()),
        _ => None,
    });
    serve(build_router(Arc::new(AppState::new(config).unwrap()))).await
}

async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn relay(primary: String, secondary: String) -> RelayClient<HttpTransport> {
    let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
    RelayClient::new(transport, RelayEndpoints::new(primary, secondary))
}

fn session() -> ChatSession {
    ChatSession::new(SessionId::from("s1".to_string()))
}

#[tokio::test]
async fn test_reply_through_proxy() {
    let webhook = spawn_webhook().await;
    let proxy = spawn_proxy(format!("http://{webhook}/webhook")).await;
    let client = relay(
        format!("http://{proxy}/api/chat"),
        format!("http://{webhook}/webhook"),
    );
    let mut session = session();

    let outcome = client.send_message(&mut session, "hello").await.unwrap();
    assert_eq!(outcome, RelayOutcome::Replied("echo: hello".into()));
    assert!(session.transport.using_primary);
    assert!(!session.transport.using_fallback_transport);
}

#[tokio::test]
async fn test_missing_proxy_route_switches_to_webhook() {
    let webhook = spawn_webhook().await;
    // The webhook host has no /api/chat, so the primary answers 404.
    let client = relay(
        format!("http://{webhook}/api/chat"),
        format!("http://{webhook}/webhook"),
    );
    let mut session = session();

    let outcome = client.send_message(&mut session, "hello").await.unwrap();
    assert_eq!(outcome, RelayOutcome::Replied("echo: hello".into()));
    assert!(!session.transport.using_primary);

    let outcome = client.send_message(&mut session, "again").await.unwrap();
    assert_eq!(outcome, RelayOutcome::Replied("echo: again".into()));
}

#[tokio::test]
async fn test_proxy_error_falls_back_to_unverifiable() {
    let dead = closed_addr().await;
    let proxy = spawn_proxy(format!("http://{dead}/webhook")).await;
    let client = relay(format!("http://{proxy}/api/chat"), format!("http://{dead}/webhook"));
    let mut session = session();

    // Verified send gets the proxy's 500; the unverifiable resend still
    // reaches the proxy, which is all that mode can observe.
    let outcome = client.send_message(&mut session, "hello").await.unwrap();
    assert_eq!(outcome, RelayOutcome::SentUnverified);
    assert!(session.transport.using_primary);
    assert!(session.transport.using_fallback_transport);
}

#[tokio::test]
async fn test_nothing_reachable() {
    let dead = closed_addr().await;
    let client = relay(format!("http://{dead}/api/chat"), format!("http://{dead}/webhook"));
    let mut session = session();

    let outcome = client.send_message(&mut session, "hello").await.unwrap();
    assert_eq!(outcome, RelayOutcome::Unreachable);
    assert!(outcome.text().contains("Unable to connect to server."));
}
