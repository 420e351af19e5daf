//! Outbound forwarding to the configured webhook.

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, Url};

use beacon_core::{Error, Result};

pub const DEFAULT_REQUEST_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_RESPONSE_CONTENT_TYPE: &str = "text/plain";

/// Methods whose outbound request carries the (possibly empty) JSON body.
pub fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

/// Destination URL with the inbound query appended to its own query.
pub fn resolve_target(destination: &str, inbound_query: Option<&str>) -> Result<Url> {
    let mut url = Url::parse(destination)
        .map_err(|e| Error::InvalidUrl(format!("{destination}: {e}")))?;

    if let Some(extra) = inbound_query.filter(|q| !q.is_empty()) {
        let merged = match url.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{extra}"),
            _ => extra.to_string(),
        };
        url.set_query(Some(&merged));
    }

    Ok(url)
}

/// A request about to be relayed upstream.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: Method,
    pub target: Url,
    pub content_type: String,
    pub body: Option<serde_json::Value>,
}

/// Upstream payload, parsed when it declared itself JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(serde_json::Value),
    Text(String),
}

/// Upstream response, mirrored back to the caller verbatim.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: UpstreamBody,
}

impl UpstreamResponse {
    /// Interpret raw upstream text according to its content type. JSON that
    /// fails to parse is passed through as text.
    pub fn from_parts(status: StatusCode, content_type: Option<&str>, text: String) -> Self {
        let content_type = content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_RESPONSE_CONTENT_TYPE)
            .to_string();

        let body = if content_type.contains("application/json") {
            match serde_json::from_str(&text) {
                Ok(value) => UpstreamBody::Json(value),
                Err(_) => UpstreamBody::Text(text),
            }
        } else {
            UpstreamBody::Text(text)
        };

        Self {
            status,
            content_type,
            body,
        }
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let content_type = HeaderValue::from_str(&self.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_RESPONSE_CONTENT_TYPE));
        let body = match self.body {
            UpstreamBody::Json(value) => value.to_string(),
            UpstreamBody::Text(text) => text,
        };
        (self.status, [(CONTENT_TYPE, content_type)], body).into_response()
    }
}

/// Send `req` upstream and collect the response.
pub async fn forward(
    client: &Client,
    req: ForwardRequest,
) -> std::result::Result<UpstreamResponse, reqwest::Error> {
    let mut builder = client
        .request(req.method.clone(), req.target)
        .header(CONTENT_TYPE, req.content_type);

    if carries_body(&req.method) {
        let body = req.body.unwrap_or_else(|| serde_json::json!({}));
        builder = builder.body(body.to_string());
    }

    let response = builder.send().await?;
    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response.text().await?;

    Ok(UpstreamResponse::from_parts(status, content_type.as_deref(), text))
}
