//! Prometheus metrics for the API server.

use std::future::Future;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use lens_inference::InferenceResult;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "lens_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "lens_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "lens_http_requests_in_flight";

    // Model collaborator metrics
    pub const COLLABORATOR_CALLS_TOTAL: &str = "lens_collaborator_calls_total";
    pub const COLLABORATOR_DURATION_SECONDS: &str = "lens_collaborator_duration_seconds";
    pub const UNKNOWN_FALLBACKS_TOTAL: &str = "lens_unknown_fallbacks_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "lens_rate_limit_hits_total";
}

/// Routes reported with their own label; anything else is "other".
const KNOWN_ROUTES: &[&str] = &[
    "/",
    "/detect-mood",
    "/summarize-text",
    "/classify-image",
    "/explain-image",
    "/analyze-camera-feed",
    "/health",
    "/healthz",
    "/ready",
    "/metrics",
];

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_label(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record one model call.
pub fn record_collaborator_call(collaborator: &str, ok: bool, duration_secs: f64) {
    let labels = [
        ("collaborator", collaborator.to_string()),
        ("outcome", if ok { "ok" } else { "error" }.to_string()),
    ];
    counter!(names::COLLABORATOR_CALLS_TOTAL, &labels).increment(1);
    histogram!(names::COLLABORATOR_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record an analysis field that fell back to "unknown".
pub fn record_unknown_fallback(field: &str) {
    let labels = [("field", field.to_string())];
    counter!(names::UNKNOWN_FALLBACKS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", route_label(endpoint).to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Time a collaborator call and record its outcome.
pub async fn observe_collaborator<T, F>(collaborator: &str, call: F) -> InferenceResult<T>
where
    F: Future<Output = InferenceResult<T>>,
{
    let start = Instant::now();
    let result = call.await;
    record_collaborator_call(collaborator, result.is_ok(), start.elapsed().as_secs_f64());
    result
}

/// Keep label cardinality bounded.
fn route_label(path: &str) -> &str {
    KNOWN_ROUTES
        .iter()
        .find(|route| **route == path)
        .copied()
        .unwrap_or("other")
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
