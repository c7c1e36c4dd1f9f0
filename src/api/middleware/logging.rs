//! Request logging middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::HeaderName, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, info, warn};

/// Headers worth recording; credentials among them are redacted
const LOGGED_HEADERS: [&str; 6] = [
    "authorization",
    "content-type",
    "content-length",
    "user-agent",
    "x-request-id",
    "x-forwarded-for",
];

/// Log every request and its outcome with credentials redacted.
///
/// Runs inside `TraceLayer`'s span and opens none of its own.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = matched_path(&request);
    let request_id = extract_request_id(&request);

    debug!(
        method = %method,
        path = %path,
        request_id = %request_id,
        headers = %redact_headers(&request),
        "Incoming request"
    );

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(method = %method, path = %path, status, duration_ms, request_id = %request_id, "Request failed");
    } else {
        info!(method = %method, path = %path, status, duration_ms, request_id = %request_id, "Request completed");
    }

    response
}

/// Route template when matched, so ids do not explode log cardinality
fn matched_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn redact_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .filter(|(name, _)| LOGGED_HEADERS.contains(&name.as_str()))
        .map(|(name, value)| {
            let shown = if is_sensitive_header(name) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            format!("{}={}", name, shown)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_sensitive_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "authorization" | "cookie" | "set-cookie" | "proxy-authorization"
    )
}
