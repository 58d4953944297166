//! Host-level routes and the middleware stack wrapped around module routes.

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderName, Request},
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

const DEFAULT_TIMEOUT_SEC: u64 = 30;
const BODY_LIMIT: usize = 1024 * 1024;

fn x_request_id() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub fn base_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Wrap `router` with (outermost first): request id set/propagate, trace, timeout, body limit.
pub fn with_middleware(router: Router, timeout_sec: u64) -> Router {
    let timeout = match timeout_sec {
        0 => DEFAULT_TIMEOUT_SEC,
        n => n,
    };
    let header = x_request_id();

    // layers added later wrap the ones added earlier
    router
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TimeoutLayer::new(Duration::from_secs(timeout)))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                let rid = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");
                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    request_id = %rid,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(header.clone()))
        .layer(SetRequestIdLayer::new(header, MakeRequestUuid))
}
