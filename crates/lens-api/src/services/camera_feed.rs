//! Camera-feed analyzer.
//!
//! Runs the captioner, emotion analyzer and object detector against one
//! frame and merges their answers into an [`AnalysisResult`]. Each call is
//! isolated: a failure, a timeout or an empty answer turns that one field
//! into `"unknown"` and never fails the whole analysis.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use lens_inference::{Captioner, EmotionAnalyzer, Frame, InferenceResult, ObjectDetector};
use lens_models::{top_detection, AnalysisResult, FieldOutcome};
use tracing::{debug, warn};

use crate::metrics;
use crate::services::deadline::bounded_call;

/// Default bound on each collaborator call.
pub const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct CameraFeedAnalyzer {
    captioner: Arc<dyn Captioner>,
    emotion: Arc<dyn EmotionAnalyzer>,
    detector: Arc<dyn ObjectDetector>,
    timeout: Duration,
}

impl CameraFeedAnalyzer {
    pub fn new(
        captioner: Arc<dyn Captioner>,
        emotion: Arc<dyn EmotionAnalyzer>,
        detector: Arc<dyn ObjectDetector>,
    ) -> Self {
        Self {
            captioner,
            emotion,
            detector,
            timeout: DEFAULT_COLLABORATOR_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Analyze one frame.
    ///
    /// The three collaborators run concurrently; the merge is positional, so
    /// the result does not depend on completion order.
    pub async fn analyze(&self, frame: &Frame) -> AnalysisResult {
        let (caption, mood, activity) =
            tokio::join!(self.caption(frame), self.mood(frame), self.activity(frame));

        for (field, outcome) in [("caption", &caption), ("mood", &mood), ("activity", &activity)] {
            if let Some(reason) = outcome.reason() {
                warn!(field, reason, "Analysis field unavailable, using \"unknown\"");
                metrics::record_unknown_fallback(field);
            }
        }

        let result = AnalysisResult::merge(caption, mood, activity);
        debug!(
            caption = %result.caption,
            mood = %result.mood,
            activity = %result.activity,
            "Camera feed analyzed"
        );
        result
    }

    async fn caption(&self, frame: &Frame) -> FieldOutcome<String> {
        self.guarded("captioner", self.captioner.caption(frame)).await
    }

    async fn mood(&self, frame: &Frame) -> FieldOutcome<String> {
        self.guarded("emotion", self.emotion.analyze(frame))
            .await
            .and_then_some(|scores| scores.dominant().map(str::to_string), "no dominant emotion")
    }

    async fn activity(&self, frame: &Frame) -> FieldOutcome<String> {
        self.guarded("detector", self.detector.detect(frame))
            .await
            .and_then_some(
                |detections| top_detection(&detections).map(|d| d.label.clone()),
                "no objects detected",
            )
    }

    async fn guarded<T, F>(&self, collaborator: &str, call: F) -> FieldOutcome<T>
    where
        F: Future<Output = InferenceResult<T>>,
    {
        FieldOutcome::from_result(bounded_call(collaborator, self.timeout, call).await)
    }
}
