//! HTTP route handlers and the layers shared by every route.

pub mod chat;
pub mod health;

use std::any::Any;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::ORIGIN;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyValue, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::AppError;
use crate::state::AppState;
use beacon_core::BeaconConfig;

/// Build the main Axum router.
///
/// Anything no route matches is served from the static root, falling back
/// to `index.html`. Requests from a foreign origin are refused before CORS
/// or any route sees them.
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_files =
        ServeDir::new(&state.config.static_dir).fallback(ServeFile::new(state.config.index_file()));

    Router::new()
        .merge(health::routes())
        .merge(chat::routes())
        .fallback_service(static_files)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&state.config))
        .layer(middleware::from_fn_with_state(state.clone(), reject_foreign_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Requests without an `Origin` header always pass.
async fn reject_foreign_origin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let foreign = request
        .headers()
        .get(ORIGIN)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .filter(|origin| !state.config.allows_origin(origin));

    if let Some(origin) = foreign {
        return AppError::OriginNotAllowed(origin).into_response();
    }
    next.run(request).await
}

fn cors_layer(config: &BeaconConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(&config.allowed_origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                warn!(
                    "Invalid ALLOWED_ORIGIN {:?}: {}, rejecting cross-origin requests",
                    config.allowed_origin, e
                );
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AnyValue)
        .allow_headers(AnyValue)
}

/// Catch-all boundary: a panicking handler becomes a generic 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Unhandled error: {}", detail);
    AppError::Internal(detail).into_response()
}
