//! Class label set for the image classifier.

use std::path::Path;

use reqwest::Client;
use tracing::info;

use crate::error::{InferenceError, InferenceResult};

/// Human-readable ImageNet labels, one per class index.
pub const DEFAULT_LABELS_URL: &str =
    "https://raw.githubusercontent.com/anishathalye/imagenet-simple-labels/master/imagenet-simple-labels.json";

/// Ordered list of class names.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> InferenceResult<Self> {
        if labels.is_empty() {
            return Err(InferenceError::Labels("label set is empty".to_string()));
        }
        Ok(Self { labels })
    }

    /// Parse a JSON array of strings.
    pub fn from_json(bytes: &[u8]) -> InferenceResult<Self> {
        let labels: Vec<String> = serde_json::from_slice(bytes)
            .map_err(|e| InferenceError::Labels(format!("expected a JSON array of strings: {}", e)))?;
        Self::new(labels)
    }

    pub async fn from_path(path: impl AsRef<Path>) -> InferenceResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let set = Self::from_json(&bytes)?;
        info!(path = %path.display(), count = set.len(), "Loaded class labels from file");
        Ok(set)
    }

    /// Download the label list.
    pub async fn fetch(client: &Client, url: &str) -> InferenceResult<Self> {
        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(InferenceError::Labels(format!(
                "label download from {} returned {}",
                url,
                response.status()
            )));
        }
        let bytes = response.bytes().await?;
        let set = Self::from_json(&bytes)?;
        info!(url = %url, count = set.len(), "Fetched class labels");
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Label of the highest logit.
    pub fn top_label(&self, logits: &[f32]) -> InferenceResult<&str> {
        let index = argmax(logits)
            .ok_or_else(|| InferenceError::invalid_response("classifier returned no finite logits"))?;
        self.get(index).ok_or_else(|| {
            InferenceError::invalid_response(format!(
                "predicted index {} out of range for {} labels",
                index,
                self.len()
            ))
        })
    }
}

/// Index of the largest finite value; the first one wins on ties.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, top)) if v <= top => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 2.0, 1.5]), Some(1));
        assert_eq!(argmax(&[3.0, 3.0]), Some(0));
        assert_eq!(argmax(&[f32::NAN, -1.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn test_top_label() {
        let set = LabelSet::from_json(br#"["tench", "goldfish", "great white shark"]"#).unwrap();
        assert_eq!(set.top_label(&[0.0, 5.0, 1.0]).unwrap(), "goldfish");
        assert!(set.top_label(&[0.0, 0.0, 0.0, 9.0]).is_err());
        assert!(set.top_label(&[]).is_err());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(LabelSet::from_json(b"[]").is_err());
        assert!(LabelSet::from_json(br#"{"0": "tench"}"#).is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("labels.json");
        std::fs::write(&file, r#"["tench", "goldfish"]"#).unwrap();

        let set = tokio_test::block_on(LabelSet::from_path(&file)).unwrap();
        assert_eq!(set.get(0), Some("tench"));

        let missing = tokio_test::block_on(LabelSet::from_path(dir.path().join("nope.json")));
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/labels.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"["cat", "dog"]"#))
            .mount(&server)
            .await;

        let set = LabelSet::fetch(&Client::new(), &format!("{}/labels.json", server.uri()))
            .await
            .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(1), Some("dog"));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        let result = LabelSet::fetch(&Client::new(), &format!("{}/missing.json", server.uri())).await;
        assert!(matches!(result, Err(InferenceError::Labels(_))));
    }
}
