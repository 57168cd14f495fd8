//! API layer - HTTP and Server-Sent Events entry points.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::app::App;

pub mod http;
pub mod stream;

/// The complete router: routes, request tracing and optional CORS.
pub fn router(app: Arc<App>, allowed_origins: Option<&str>) -> Router {
    let mut router = http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(allowed_origins) {
        router = router.layer(cors);
    }

    router
}

/// `*` allows any origin; otherwise a comma-separated list. `None` when unset
/// or when no listed origin is a valid header value.
pub fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins.map(str::trim).filter(|s| !s.is_empty())?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        // Browsers preflight JSON POSTs
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        return Some(cors.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(cors.allow_origin(origins))
}
