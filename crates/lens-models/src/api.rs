//! HTTP request and response bodies.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sentiment::SentimentCategory;

/// Body of the text endpoints.
///
/// `text` is optional so a missing field can be reported as a validation
/// error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

impl TextRequest {
    /// The text, if present and not blank.
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MoodResponse {
    pub mood: SentimentCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResponse {
    pub prediction: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CaptionResponse {
    pub caption: String,
}

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_request_missing_or_blank() {
        let req: TextRequest = serde_json::from_str("{}").unwrap();
        assert!(req.non_empty_text().is_none());

        let req: TextRequest = serde_json::from_str(r#"{"text": "   "}"#).unwrap();
        assert!(req.non_empty_text().is_none());

        let req: TextRequest = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(req.non_empty_text(), Some("hello"));
    }

    #[test]
    fn test_mood_response_shape() {
        let body = serde_json::to_string(&MoodResponse { mood: SentimentCategory::Content }).unwrap();
        assert_eq!(body, r#"{"mood":"content"}"#);
    }
}
