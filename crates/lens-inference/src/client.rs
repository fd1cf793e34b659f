//! Inference service HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use lens_models::{Detection, EmotionScores};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::collaborators::{Captioner, EmotionAnalyzer, ImageClassifier, ObjectDetector, Summarizer, SummaryParams};
use crate::error::{InferenceError, InferenceResult};
use crate::frame::Frame;
use crate::preprocess::ImageTensor;
use crate::types::{
    parse_face_analysis, CaptionReply, ClassifyReply, ClassifyRequest, DetectReply, HealthResponse,
    SummarizeRequest, SummaryReply,
};

/// Configuration for the inference client.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Base URL of the inference service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries
    pub max_retries: u32,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 2,
        }
    }
}

impl InferenceConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("INFERENCE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("INFERENCE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
            max_retries: std::env::var("INFERENCE_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the model inference service.
///
/// One client backs every HTTP collaborator; the underlying connection pool
/// is shared.
#[derive(Clone)]
pub struct InferenceClient {
    http: Client,
    config: InferenceConfig,
}

impl InferenceClient {
    /// Create a new inference client.
    pub fn new(config: InferenceConfig) -> InferenceResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(InferenceError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> InferenceResult<Self> {
        Self::new(InferenceConfig::from_env())
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Check if the inference service is healthy.
    pub async fn health_check(&self) -> InferenceResult<bool> {
        let url = self.url("/health");

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Inference service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Inference service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Upload the frame as multipart `file` and return the raw response body.
    async fn post_frame(&self, path: &str, frame: &Frame) -> InferenceResult<Vec<u8>> {
        let url = self.url(path);
        let jpeg = frame.jpeg()?;

        debug!(url = %url, bytes = jpeg.len(), "Uploading frame to inference service");

        let response = self
            .with_retry(|| async {
                let part = Part::bytes(jpeg.to_vec())
                    .file_name("frame.jpg")
                    .mime_str("image/jpeg")
                    .map_err(InferenceError::Network)?;
                let form = Form::new().part("file", part);
                let response = self
                    .http
                    .post(&url)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(InferenceError::Network)?;
                check_status(response).await
            })
            .await?;

        Ok(response.bytes().await?.to_vec())
    }

    /// POST a JSON body and decode the JSON reply.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> InferenceResult<R>
    where
        B: serde::Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(url = %url, "Sending request to inference service");

        let response = self
            .with_retry(|| async {
                let response = self
                    .http
                    .post(&url)
                    .json(body)
                    .send()
                    .await
                    .map_err(InferenceError::Network)?;
                check_status(response).await
            })
            .await?;

        let bytes = response.bytes().await?;
        decode(path, &bytes)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> InferenceResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = InferenceResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Inference request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(InferenceError::RequestFailed("Unknown error".to_string())))
    }
}

async fn check_status(response: Response) -> InferenceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = format!("inference service returned {}: {}", status, body);
    if status.is_server_error() {
        Err(InferenceError::ServiceUnavailable(message))
    } else {
        Err(InferenceError::RequestFailed(message))
    }
}

fn decode<R: DeserializeOwned>(path: &str, bytes: &[u8]) -> InferenceResult<R> {
    serde_json::from_slice(bytes)
        .map_err(|e| InferenceError::invalid_response(format!("{}: {}", path, e)))
}

#[async_trait]
impl Captioner for InferenceClient {
    async fn caption(&self, frame: &Frame) -> InferenceResult<String> {
        let body = self.post_frame("/caption", frame).await?;
        let reply: CaptionReply = decode("/caption", &body)?;
        Ok(reply.caption.trim().to_string())
    }
}

#[async_trait]
impl EmotionAnalyzer for InferenceClient {
    async fn analyze(&self, frame: &Frame) -> InferenceResult<EmotionScores> {
        let body = self.post_frame("/emotion", frame).await?;
        parse_face_analysis(&body)
    }
}

#[async_trait]
impl ObjectDetector for InferenceClient {
    async fn detect(&self, frame: &Frame) -> InferenceResult<Vec<Detection>> {
        let body = self.post_frame("/detect", frame).await?;
        let reply: DetectReply = decode("/detect", &body)?;
        Ok(reply.detections.into_iter().map(Detection::from).collect())
    }
}

#[async_trait]
impl ImageClassifier for InferenceClient {
    async fn logits(&self, tensor: &ImageTensor) -> InferenceResult<Vec<f32>> {
        let request = ClassifyRequest::from(tensor);
        let reply: ClassifyReply = self.post_json("/classify", &request).await?;
        Ok(reply.logits)
    }
}

#[async_trait]
impl Summarizer for InferenceClient {
    async fn summarize(&self, text: &str, params: &SummaryParams) -> InferenceResult<String> {
        let request = SummarizeRequest {
            text: text.to_string(),
            max_length: params.max_length,
            min_length: params.min_length,
            do_sample: params.do_sample,
        };
        let reply: SummaryReply = self.post_json("/summarize", &request).await?;
        reply.into_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> InferenceClient {
        InferenceClient::new(InferenceConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            max_retries: 1,
        })
        .unwrap()
    }

    fn frame() -> Frame {
        Frame::from_rgb(RgbImage::from_pixel(8, 8, Rgb([120, 80, 40])))
    }

    #[test]
    fn test_config_defaults() {
        let config = InferenceConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[tokio::test]
    async fn test_caption() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/caption"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"caption": " a brown square "})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let caption = client_for(&server).caption(&frame()).await.unwrap();
        assert_eq!(caption, "a brown square");
    }

    #[tokio::test]
    async fn test_detect() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "detections": [
                    {"name": "person", "confidence": 0.9, "xmin": 0, "ymin": 0, "xmax": 4, "ymax": 4},
                    {"name": "dog", "confidence": 0.95, "xmin": 1, "ymin": 1, "xmax": 5, "ymax": 5}
                ]
            })))
            .mount(&server)
            .await;

        let detections = client_for(&server).detect(&frame()).await.unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(lens_models::top_detection(&detections).unwrap().label, "dog");
    }

    #[tokio::test]
    async fn test_emotion_malformed_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emotion"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{"age": 31}])))
            .mount(&server)
            .await;

        let result = client_for(&server).analyze(&frame()).await;
        assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/caption"))
            .respond_with(ResponseTemplate::new(422).set_body_string("bad image"))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).caption(&frame()).await;
        assert!(matches!(result, Err(InferenceError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_server_error_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/detect"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let result = client_for(&server).detect(&frame()).await;
        assert!(matches!(result, Err(InferenceError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn test_summarize_sends_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .and(body_json(serde_json::json!({
                "text": "long text",
                "max_length": 150,
                "min_length": 50,
                "do_sample": false
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{"summary_text": "short"}])),
            )
            .mount(&server)
            .await;

        let summary = client_for(&server)
            .summarize("long text", &SummaryParams::default())
            .await
            .unwrap();
        assert_eq!(summary, "short");
    }

    #[tokio::test]
    async fn test_classify() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/classify"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"logits": [0.1, 3.0, 0.2]})),
            )
            .mount(&server)
            .await;

        let tensor = ImageTensor { shape: [1, 3, 1, 1], data: vec![0.0, 0.5, 1.0] };
        let logits = client_for(&server).logits(&tensor).await.unwrap();
        assert_eq!(logits, vec![0.1, 3.0, 0.2]);
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let client = InferenceClient::new(InferenceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(500),
            max_retries: 0,
        })
        .unwrap();
        assert!(!client.health_check().await.unwrap());
    }
}
