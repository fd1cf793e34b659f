//! Inference service request/response types.
//!
//! Every response is deserialized into an explicit structure here; shapes
//! that do not match are reported as `InferenceError::InvalidResponse`.

use lens_models::{BoundingBox, Detection, EmotionScores};
use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, InferenceResult};
use crate::preprocess::ImageTensor;

/// Caption generation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionReply {
    pub caption: String,
}

/// One face from a DeepFace-style analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceAnalysis {
    #[serde(default)]
    pub emotion: Option<EmotionScores>,
}

/// Face analyzers report either a list of faces or a single face.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FaceAnalysisReply {
    Many(Vec<FaceAnalysis>),
    One(FaceAnalysis),
}

/// Extract the emotion scores of the first face.
pub fn parse_face_analysis(bytes: &[u8]) -> InferenceResult<EmotionScores> {
    let reply: FaceAnalysisReply = serde_json::from_slice(bytes)
        .map_err(|e| InferenceError::invalid_response(format!("face analysis: {}", e)))?;

    let face = match reply {
        FaceAnalysisReply::Many(faces) => faces
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::invalid_response("face analysis returned no faces"))?,
        FaceAnalysisReply::One(face) => face,
    };

    let scores = face
        .emotion
        .ok_or_else(|| InferenceError::invalid_response("face analysis has no emotion scores"))?;
    if scores.is_empty() {
        return Err(InferenceError::invalid_response("face analysis emotion scores are empty"));
    }
    Ok(scores)
}

/// Object detection response, one row per detected object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectReply {
    pub detections: Vec<RawDetection>,
}

/// Detector row in `xyxy` layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDetection {
    pub name: String,
    pub confidence: f32,
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_id: Option<u32>,
}

impl From<RawDetection> for Detection {
    fn from(raw: RawDetection) -> Self {
        Detection {
            label: raw.name,
            confidence: raw.confidence,
            bbox: BoundingBox {
                xmin: raw.xmin,
                ymin: raw.ymin,
                xmax: raw.xmax,
                ymax: raw.ymax,
            },
            class_id: raw.class_id,
        }
    }
}

/// Classification request carrying a preprocessed tensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub shape: Vec<usize>,
    pub dtype: String,
    /// Base64 of little-endian f32 values
    pub data: String,
}

impl From<&ImageTensor> for ClassifyRequest {
    fn from(tensor: &ImageTensor) -> Self {
        Self {
            shape: tensor.shape.to_vec(),
            dtype: "float32".to_string(),
            data: tensor.to_le_base64(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyReply {
    pub logits: Vec<f32>,
}

/// Summarization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    pub max_length: u32,
    pub min_length: u32,
    pub do_sample: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryItem {
    pub summary_text: String,
}

/// Summarizers return either a list of candidates or a single one.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SummaryReply {
    Many(Vec<SummaryItem>),
    One(SummaryItem),
}

impl SummaryReply {
    pub fn into_text(self) -> InferenceResult<String> {
        match self {
            SummaryReply::Many(items) => items
                .into_iter()
                .next()
                .map(|item| item.summary_text)
                .ok_or_else(|| InferenceError::invalid_response("summarizer returned no candidates")),
            SummaryReply::One(item) => Ok(item.summary_text),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
