//! `beacon chat` and `beacon track` against local endpoints.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use beacon_core::BeaconConfig;
use beacon_relay::{RelayOutcome, SinkDelivery};
use beacon_server::commands;

type Rows = Arc<Mutex<Vec<Value>>>;

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    let input = body["chatInput"].as_str().unwrap_or_default();
    Json(json!({ "output": format!("echo: {input}") }))
}

async fn store(State(rows): State<Rows>, Json(record): Json<Value>) -> Json<Value> {
    rows.lock().unwrap().push(record);
    Json(json!({ "success": true }))
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(vars: Vec<(&'static str, String)>) -> BeaconConfig {
    BeaconConfig::from_lookup(move |key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    })
}

#[tokio::test]
async fn test_chat_uses_configured_endpoints() {
    let webhook = serve(Router::new().route("/webhook", post(echo))).await;

    // The primary has no /api/chat, so the relay moves on to the webhook.
    let config = config(vec![
        ("RELAY_PRIMARY_URL", format!("http://{webhook}/api/chat")),
        ("N8N_WEBHOOK_URL", format!("http://{webhook}/webhook")),
    ]);
    let outcome = commands::chat(&config, "bonjour").await.unwrap();
    assert_eq!(outcome, RelayOutcome::Replied("echo: bonjour".into()));
}

#[tokio::test]
async fn test_chat_rejects_blank_message() {
    assert!(commands::chat(&BeaconConfig::default(), "   ").await.is_err());
}

#[tokio::test]
async fn test_track_posts_to_configured_sink() {
    let rows: Rows = Arc::default();
    let sink = serve(
        Router::new()
            .route("/exec", post(store))
            .with_state(rows.clone()),
    )
    .await;

    let config = config(vec![("GOOGLE_SCRIPT_URL", format!("http://{sink}/exec"))]);
    let delivery = commands::track(&config, "Visit").await.unwrap();
    assert_eq!(delivery, Some(SinkDelivery::Confirmed));

    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["action"], "Visit");
    assert!(rows[0]["sessionId"].as_str().unwrap().starts_with("session_"));
}

#[tokio::test]
async fn test_track_without_sink() {
    let delivery = commands::track(&BeaconConfig::default(), "Visit").await.unwrap();
    assert_eq!(delivery, None);
}
