//! Application state.

use std::sync::Arc;

use anyhow::Context;
use lens_inference::{
    Captioner, EmotionAnalyzer, FaceAnalysisCommand, ImageClassifier, InferenceClient, LabelSet,
    LexiconSentiment, ObjectDetector, SentimentScorer, Summarizer,
};
use tracing::info;

use crate::config::{ApiConfig, EmotionBackend};
use crate::services::CameraFeedAnalyzer;

/// The model collaborators behind the endpoints.
#[derive(Clone)]
pub struct Collaborators {
    pub captioner: Arc<dyn Captioner>,
    pub emotion: Arc<dyn EmotionAnalyzer>,
    pub detector: Arc<dyn ObjectDetector>,
    pub classifier: Arc<dyn ImageClassifier>,
    pub summarizer: Arc<dyn Summarizer>,
    pub sentiment: Arc<dyn SentimentScorer>,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub models: Collaborators,
    pub labels: Arc<LabelSet>,
    pub analyzer: CameraFeedAnalyzer,
    /// Present when the models are served by the inference service.
    pub inference: Option<InferenceClient>,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let client = InferenceClient::new(config.inference.clone())
            .context("Failed to create inference client")?;

        let labels = match &config.labels_path {
            Some(path) => LabelSet::from_path(path)
                .await
                .with_context(|| format!("Failed to load labels from {}", path.display()))?,
            None => LabelSet::fetch(client.http(), &config.labels_url)
                .await
                .with_context(|| format!("Failed to fetch labels from {}", config.labels_url))?,
        };
        info!(count = labels.len(), "Loaded classifier labels");

        let sentiment = match &config.sentiment_lexicon_path {
            Some(path) => LexiconSentiment::from_path(path)
                .await
                .with_context(|| format!("Failed to load sentiment lexicon from {}", path.display()))?,
            None => LexiconSentiment::new(),
        };

        let emotion: Arc<dyn EmotionAnalyzer> = match &config.emotion_backend {
            EmotionBackend::Http => Arc::new(client.clone()),
            EmotionBackend::Command { program, args } => {
                let mut command = FaceAnalysisCommand::new(program)
                    .with_context(|| format!("Face analysis program '{}' unavailable", program))?
                    .with_args(args)
                    .with_timeout(config.collaborator_deadline());
                if let Some(dir) = &config.temp_dir {
                    command = command.with_temp_dir(dir);
                }
                info!(program = %command.program().display(), "Using face analysis command");
                Arc::new(command)
            }
        };

        let shared = Arc::new(client.clone());
        let models = Collaborators {
            captioner: shared.clone(),
            emotion,
            detector: shared.clone(),
            classifier: shared.clone(),
            summarizer: shared,
            sentiment: Arc::new(sentiment),
        };

        let mut state = Self::from_parts(config, models, labels);
        state.inference = Some(client);
        Ok(state)
    }

    /// Assemble state from already-built collaborators.
    pub fn from_parts(config: ApiConfig, models: Collaborators, labels: LabelSet) -> Self {
        let analyzer = CameraFeedAnalyzer::new(
            Arc::clone(&models.captioner),
            Arc::clone(&models.emotion),
            Arc::clone(&models.detector),
        )
        .with_timeout(config.collaborator_deadline());

        Self {
            config,
            models,
            labels: Arc::new(labels),
            analyzer,
            inference: None,
        }
    }
}
