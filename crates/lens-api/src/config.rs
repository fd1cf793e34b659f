//! API configuration.

use std::path::PathBuf;
use std::time::Duration;

use lens_inference::{InferenceConfig, SummaryParams, DEFAULT_LABELS_URL};

/// Which backend answers emotion analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmotionBackend {
    /// The inference service `/emotion` endpoint
    Http,
    /// A local face-analysis program fed a temporary image file
    Command { program: String, args: Vec<String> },
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second (per client IP)
    pub rate_limit_rps: u32,
    /// Request timeout
    pub request_timeout: Duration,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Expose Prometheus metrics at /metrics
    pub metrics_enabled: bool,
    /// Inference service connection
    pub inference: InferenceConfig,
    /// Upper bound on each model call
    pub collaborator_timeout: Duration,
    /// Where the classifier label list is downloaded from
    pub labels_url: String,
    /// Local label list, used instead of the URL when set
    pub labels_path: Option<PathBuf>,
    /// JSON `{"word": score}` file merged onto the built-in sentiment lexicon
    pub sentiment_lexicon_path: Option<PathBuf>,
    pub emotion_backend: EmotionBackend,
    /// Directory for temporary image files
    pub temp_dir: Option<PathBuf>,
    pub summary: SummaryParams,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            request_timeout: Duration::from_secs(120),
            max_body_size: 10 * 1024 * 1024, // 10MB
            environment: "development".to_string(),
            metrics_enabled: true,
            inference: InferenceConfig::default(),
            collaborator_timeout: Duration::from_secs(30),
            labels_url: DEFAULT_LABELS_URL.to_string(),
            labels_path: None,
            sentiment_lexicon_path: None,
            emotion_backend: EmotionBackend::Http,
            temp_dir: None,
            summary: SummaryParams::default(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT").unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            rate_limit_rps: env_parse("RATE_LIMIT_RPS").unwrap_or(defaults.rate_limit_rps),
            request_timeout: env_parse("REQUEST_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_body_size: env_parse("MAX_BODY_SIZE").unwrap_or(defaults.max_body_size),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.metrics_enabled),
            inference: InferenceConfig::from_env(),
            collaborator_timeout: env_parse("COLLABORATOR_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.collaborator_timeout),
            labels_url: std::env::var("LABELS_URL").unwrap_or(defaults.labels_url),
            labels_path: std::env::var("LABELS_PATH").ok().map(PathBuf::from),
            sentiment_lexicon_path: std::env::var("SENTIMENT_LEXICON_PATH")
                .ok()
                .map(PathBuf::from),
            emotion_backend: emotion_backend_from_env(),
            temp_dir: std::env::var("TEMP_DIR").ok().map(PathBuf::from),
            summary: SummaryParams {
                min_length: env_parse("SUMMARY_MIN_LENGTH").unwrap_or(defaults.summary.min_length),
                max_length: env_parse("SUMMARY_MAX_LENGTH").unwrap_or(defaults.summary.max_length),
                do_sample: false,
            },
        }
    }

    /// Bound for one model call: the collaborator timeout, capped at 90% of
    /// the request timeout so the handler answers before the request expires.
    pub fn collaborator_deadline(&self) -> Duration {
        self.collaborator_timeout.min(self.request_timeout * 9 / 10)
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn emotion_backend_from_env() -> EmotionBackend {
    match std::env::var("EMOTION_BACKEND").map(|v| v.to_lowercase()) {
        Ok(v) if v == "command" => EmotionBackend::Command {
            program: std::env::var("EMOTION_COMMAND").unwrap_or_else(|_| "deepface-emotion".to_string()),
            args: std::env::var("EMOTION_COMMAND_ARGS")
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        },
        _ => EmotionBackend::Http,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 5001);
        assert_eq!(config.summary.max_length, 150);
        assert_eq!(config.summary.min_length, 50);
        assert_eq!(config.emotion_backend, EmotionBackend::Http);
        assert!(!config.is_production());
        assert_eq!(config.collaborator_deadline(), Duration::from_secs(30));
        assert!(config.sentiment_lexicon_path.is_none());
    }

    #[test]
    fn test_collaborator_deadline_stays_under_request_timeout() {
        let config = ApiConfig {
            request_timeout: Duration::from_secs(1),
            collaborator_timeout: Duration::from_secs(30),
            ..ApiConfig::default()
        };
        assert_eq!(config.collaborator_deadline(), Duration::from_millis(900));

        let config = ApiConfig {
            request_timeout: Duration::from_secs(30),
            collaborator_timeout: Duration::from_secs(30),
            ..ApiConfig::default()
        };
        assert_eq!(config.collaborator_deadline(), Duration::from_secs(27));
    }
}
