//! API routes.

use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::{BoxError, Router};
use lens_inference::InferenceError;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::timeout::error::Elapsed;
use tower::timeout::TimeoutLayer;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::ApiError;
use crate::handlers::{
    analyze_camera_feed, classify_image, detect_mood, explain_image, health, ready, root,
    summarize_text,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));
    let request_timeout = state.config.request_timeout;

    // Every model endpoint is rate limited per client IP
    let model_routes = Router::new()
        .route("/detect-mood", post(detect_mood))
        .route("/summarize-text", post(summarize_text))
        .route("/classify-image", post(classify_image))
        .route("/explain-image", post(explain_image))
        .route("/analyze-camera-feed", post(analyze_camera_feed))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(model_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Uploads are bounded by the configured limit instead of axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        // Expired requests still get the JSON error body
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    request_error(err, request_timeout)
                }))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

fn request_error(err: BoxError, limit: Duration) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Collaborator(InferenceError::Timeout(limit))
    } else {
        ApiError::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_elapsed_request_is_json_400() {
        let err = request_error(Box::new(Elapsed::new()), Duration::from_secs(2));
        assert!(matches!(err, ApiError::Collaborator(InferenceError::Timeout(_))));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_layer_errors_are_internal() {
        let err = request_error("overloaded".into(), Duration::from_secs(2));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
