//! Camera-feed analysis result.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Value used for any field whose collaborator produced nothing usable.
pub const UNKNOWN: &str = "unknown";

/// Outcome of a single collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome<T> {
    Ok(T),
    Failed(String),
}

impl<T> FieldOutcome<T> {
    /// Build an outcome from a result, keeping only the error message.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// Failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(reason) => Some(reason),
        }
    }

    /// Map the success value; a `None` result becomes a failure with `reason`.
    pub fn and_then_some<U>(self, f: impl FnOnce(T) -> Option<U>, reason: &str) -> FieldOutcome<U> {
        match self {
            Self::Ok(value) => match f(value) {
                Some(mapped) => FieldOutcome::Ok(mapped),
                None => FieldOutcome::Failed(reason.to_string()),
            },
            Self::Failed(reason) => FieldOutcome::Failed(reason),
        }
    }
}

impl FieldOutcome<String> {
    /// Collapse to the field value, falling back to [`UNKNOWN`].
    pub fn or_unknown(self) -> String {
        match self {
            Self::Ok(value) if !value.trim().is_empty() => value,
            _ => UNKNOWN.to_string(),
        }
    }
}

/// Combined caption, mood and activity for one camera frame.
///
/// Every field is always serialized; missing results carry [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub caption: String,
    pub mood: String,
    pub activity: String,
}

impl AnalysisResult {
    /// Merge three independent outcomes.
    pub fn merge(
        caption: FieldOutcome<String>,
        mood: FieldOutcome<String>,
        activity: FieldOutcome<String>,
    ) -> Self {
        Self {
            caption: caption.or_unknown(),
            mood: mood.or_unknown(),
            activity: activity.or_unknown(),
        }
    }

    /// A result where every field is the sentinel.
    pub fn unknown() -> Self {
        Self {
            caption: UNKNOWN.to_string(),
            mood: UNKNOWN.to_string(),
            activity: UNKNOWN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_with_failures() {
        let result = AnalysisResult::merge(
            FieldOutcome::Ok("a man riding a bike".to_string()),
            FieldOutcome::Failed("face analyzer down".to_string()),
            FieldOutcome::Ok("bicycle".to_string()),
        );
        assert_eq!(result.caption, "a man riding a bike");
        assert_eq!(result.mood, UNKNOWN);
        assert_eq!(result.activity, "bicycle");
    }

    #[test]
    fn test_blank_value_is_unknown() {
        assert_eq!(FieldOutcome::Ok("  ".to_string()).or_unknown(), UNKNOWN);
    }

    #[test]
    fn test_all_fields_serialized() {
        let json = serde_json::to_value(AnalysisResult::unknown()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        for key in ["caption", "mood", "activity"] {
            assert_eq!(obj[key], UNKNOWN);
        }
    }

    #[test]
    fn test_and_then_some() {
        let empty: FieldOutcome<Vec<u8>> = FieldOutcome::Ok(vec![]);
        let mapped = empty.and_then_some(|v| v.first().copied(), "empty");
        assert_eq!(mapped.reason(), Some("empty"));

        let failed: FieldOutcome<Vec<u8>> = FieldOutcome::from_result(Err::<Vec<u8>, _>("boom"));
        assert_eq!(failed.reason(), Some("boom"));
    }
}
