//! Shared data models for the MoodLens model gateway.
//!
//! This crate provides Serde-serializable types for:
//! - Camera-feed analysis results and per-field outcomes
//! - Emotion score maps and object detections
//! - Sentiment categories
//! - HTTP request/response bodies

pub mod analysis;
pub mod api;
pub mod detection;
pub mod emotion;
pub mod sentiment;

// Re-export common types
pub use analysis::{AnalysisResult, FieldOutcome, UNKNOWN};
pub use api::{
    CaptionResponse, ErrorResponse, MoodResponse, PredictionResponse, SummaryResponse, TextRequest,
};
pub use detection::{top_detection, BoundingBox, Detection};
pub use emotion::EmotionScores;
pub use sentiment::{SentimentCategory, SentimentCategoryParseError};
