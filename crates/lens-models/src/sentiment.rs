//! Sentiment categories derived from text polarity.
//!
//! Polarity is a real number in [-1, 1]. Each category owns the half-open
//! interval above its threshold, so a score sitting exactly on a threshold
//! belongs to the lower category:
//!
//! | Category    | Polarity        |
//! |-------------|-----------------|
//! | `ecstatic`  | > 0.6           |
//! | `happy`     | (0.3, 0.6]      |
//! | `content`   | (0, 0.3]        |
//! | `neutral`   | (-0.3, 0]       |
//! | `sad`       | (-0.6, -0.3]    |
//! | `depressed` | <= -0.6         |

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    Ecstatic,
    Happy,
    Content,
    Neutral,
    Sad,
    Depressed,
}

impl SentimentCategory {
    /// All categories, by descending polarity.
    pub const ALL: &'static [SentimentCategory] = &[
        SentimentCategory::Ecstatic,
        SentimentCategory::Happy,
        SentimentCategory::Content,
        SentimentCategory::Neutral,
        SentimentCategory::Sad,
        SentimentCategory::Depressed,
    ];

    /// Map a polarity score to its category.
    ///
    /// NaN fails every comparison and lands in `Depressed`, same as the
    /// lowest bucket.
    pub fn from_polarity(score: f64) -> Self {
        if score > 0.6 {
            SentimentCategory::Ecstatic
        } else if score > 0.3 {
            SentimentCategory::Happy
        } else if score > 0.0 {
            SentimentCategory::Content
        } else if score > -0.3 {
            SentimentCategory::Neutral
        } else if score > -0.6 {
            SentimentCategory::Sad
        } else {
            SentimentCategory::Depressed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Ecstatic => "ecstatic",
            SentimentCategory::Happy => "happy",
            SentimentCategory::Content => "content",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Sad => "sad",
            SentimentCategory::Depressed => "depressed",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SentimentCategory {
    type Err = SentimentCategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SentimentCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.to_lowercase())
            .ok_or_else(|| SentimentCategoryParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown sentiment category: {0}")]
pub struct SentimentCategoryParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_belong_to_lower_category() {
        assert_eq!(SentimentCategory::from_polarity(0.3), SentimentCategory::Content);
        assert_eq!(SentimentCategory::from_polarity(0.31), SentimentCategory::Happy);
        assert_eq!(SentimentCategory::from_polarity(-0.6), SentimentCategory::Depressed);
        assert_eq!(SentimentCategory::from_polarity(-0.59), SentimentCategory::Sad);
        assert_eq!(SentimentCategory::from_polarity(0.6), SentimentCategory::Happy);
        assert_eq!(SentimentCategory::from_polarity(0.0), SentimentCategory::Neutral);
        assert_eq!(SentimentCategory::from_polarity(-0.3), SentimentCategory::Sad);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(SentimentCategory::from_polarity(1.0), SentimentCategory::Ecstatic);
        assert_eq!(SentimentCategory::from_polarity(-1.0), SentimentCategory::Depressed);
        assert_eq!(SentimentCategory::from_polarity(0.0001), SentimentCategory::Content);
    }

    #[test]
    fn test_every_score_maps_monotonically() {
        let mut previous = SentimentCategory::Ecstatic;
        let rank = |c: SentimentCategory| SentimentCategory::ALL.iter().position(|x| *x == c).unwrap();
        for step in 0..=200 {
            let score = 1.0 - step as f64 * 0.01;
            let category = SentimentCategory::from_polarity(score);
            assert!(rank(category) >= rank(previous));
            previous = category;
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Happy".parse::<SentimentCategory>().unwrap(), SentimentCategory::Happy);
        assert!("furious".parse::<SentimentCategory>().is_err());
        assert_eq!(SentimentCategory::Depressed.to_string(), "depressed");
        assert_eq!(serde_json::to_string(&SentimentCategory::Sad).unwrap(), "\"sad\"");
    }
}
