//! Axum HTTP API server for the MoodLens model gateway.
//!
//! This crate provides:
//! - Text endpoints (mood detection, summarization)
//! - Image endpoints (classification, captioning, camera-feed analysis)
//! - Per-IP rate limiting and security headers
//! - Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ApiConfig, EmotionBackend};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::CameraFeedAnalyzer;
pub use state::{AppState, Collaborators};
