//! Chat relay route — `ANY /api/chat` forwarded to the configured webhook.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tracing::info;

use beacon_core::config::CHAT_PATH;

use crate::error::AppError;
use crate::forward::{self, ForwardRequest, DEFAULT_REQUEST_CONTENT_TYPE};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(CHAT_PATH, any(forward_chat))
}

/// ANY /api/chat — forward to the webhook and mirror its response.
async fn forward_chat(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let inbound_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|ct| !ct.is_empty());
    let body = parse_body(inbound_type, &body)?;
    let query = uri.query();

    info!(
        %method,
        path = uri.path(),
        query = query.unwrap_or(""),
        body = %body.as_ref().map(|b| b.to_string()).unwrap_or_default(),
        "Incoming chat request"
    );

    let content_type = inbound_type
        .unwrap_or(DEFAULT_REQUEST_CONTENT_TYPE)
        .to_string();

    let target = forward::resolve_target(&state.config.webhook_url, query)?;
    info!("Forwarding {} to {}", method, target);

    let upstream = forward::forward(
        &state.http,
        ForwardRequest {
            method,
            target,
            content_type,
            body,
        },
    )
    .await
    .map_err(|e| AppError::Forward(e.to_string()))?;

    Ok(upstream.into_response())
}

/// Only `application/json` bodies are read. Any other or missing type, or a
/// blank body, yields `None`. A JSON body that fails to parse is an error.
fn parse_body(
    content_type: Option<&str>,
    raw: &[u8],
) -> Result<Option<serde_json::Value>, AppError> {
    if !content_type.is_some_and(is_json) || raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(raw)
        .map(Some)
        .map_err(|e| AppError::MalformedBody(e.to_string()))
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}
