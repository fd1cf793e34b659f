//! Object detections used for activity analysis.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Bounding box in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

/// A single detected object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Class name (e.g. "person", "dog")
    pub label: String,
    /// Detection confidence [0, 1]
    pub confidence: f32,
    pub bbox: BoundingBox,
    /// Detector class index, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<u32>,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
            class_id: None,
        }
    }
}

/// Detection with the highest confidence.
///
/// Ties resolve to the earliest entry. Non-finite confidences are skipped.
pub fn top_detection(detections: &[Detection]) -> Option<&Detection> {
    let mut best: Option<&Detection> = None;
    for detection in detections {
        if !detection.confidence.is_finite() {
            continue;
        }
        match best {
            Some(top) if detection.confidence <= top.confidence => {}
            _ => best = Some(detection),
        }
    }
    best
}
