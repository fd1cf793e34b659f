//! Model collaborator traits.
//!
//! Each model sits behind one of these traits so the API server can hold
//! process-wide handles (`Arc<dyn ...>`) and tests can swap in fakes.

use async_trait::async_trait;
use lens_models::{Detection, EmotionScores};

use crate::error::InferenceResult;
use crate::frame::Frame;
use crate::preprocess::ImageTensor;

/// Generates a natural-language caption for an image.
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, frame: &Frame) -> InferenceResult<String>;
}

/// Scores facial emotions in an image.
#[async_trait]
pub trait EmotionAnalyzer: Send + Sync {
    async fn analyze(&self, frame: &Frame) -> InferenceResult<EmotionScores>;
}

/// Detects objects in an image.
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    async fn detect(&self, frame: &Frame) -> InferenceResult<Vec<Detection>>;
}

/// Produces class logits from a preprocessed tensor.
#[async_trait]
pub trait ImageClassifier: Send + Sync {
    async fn logits(&self, tensor: &ImageTensor) -> InferenceResult<Vec<f32>>;
}

/// Abstractive text summarizer.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, params: &SummaryParams) -> InferenceResult<String>;
}

/// Text polarity in [-1, 1].
pub trait SentimentScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Generation bounds for the summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryParams {
    pub min_length: u32,
    pub max_length: u32,
    pub do_sample: bool,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            min_length: 50,
            max_length: 150,
            do_sample: false,
        }
    }
}
