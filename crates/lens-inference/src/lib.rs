//! Model collaborators for the MoodLens gateway.
//!
//! Models are not reimplemented here. This crate provides:
//! - Collaborator traits (captioning, emotion, detection, classification,
//!   summarization, sentiment)
//! - An HTTP client for the inference service implementing them
//! - A face-analysis command runner for file-based emotion analysis
//! - A lexicon sentiment scorer
//! - ImageNet preprocessing and the class label set

pub mod client;
pub mod collaborators;
pub mod error;
pub mod face_command;
pub mod frame;
pub mod labels;
pub mod preprocess;
pub mod sentiment;
pub mod types;

pub use client::{InferenceClient, InferenceConfig};
pub use collaborators::{
    Captioner, EmotionAnalyzer, ImageClassifier, ObjectDetector, SentimentScorer, Summarizer,
    SummaryParams,
};
pub use error::{InferenceError, InferenceResult};
pub use face_command::FaceAnalysisCommand;
pub use frame::Frame;
pub use labels::{LabelSet, DEFAULT_LABELS_URL};
pub use preprocess::{imagenet_tensor, ImageTensor};
pub use sentiment::LexiconSentiment;
