//! Emotion analysis through an external face-analysis program.
//!
//! The program takes an image path as its last argument and prints a
//! DeepFace-style JSON report on stdout. Each call writes the frame to its
//! own temporary file, which is removed when the call returns.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use lens_models::EmotionScores;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::collaborators::EmotionAnalyzer;
use crate::error::{InferenceError, InferenceResult};
use crate::frame::Frame;
use crate::types::parse_face_analysis;

/// Runner for the face-analysis program.
#[derive(Debug, Clone)]
pub struct FaceAnalysisCommand {
    program: PathBuf,
    args: Vec<String>,
    temp_dir: Option<PathBuf>,
    timeout: Duration,
}

impl FaceAnalysisCommand {
    /// Resolve `program` on PATH (or as a path) and build a runner.
    pub fn new(program: &str) -> InferenceResult<Self> {
        let program =
            which::which(program).map_err(|_| InferenceError::CommandNotFound(program.to_string()))?;
        Ok(Self {
            program,
            args: Vec::new(),
            temp_dir: None,
            timeout: Duration::from_secs(30),
        })
    }

    /// Arguments placed before the image path.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Directory for the per-call image files. Defaults to the system temp dir.
    pub fn with_temp_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.temp_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Write the frame to a fresh temp file on the blocking pool.
    async fn persist(&self, frame: &Frame) -> InferenceResult<NamedTempFile> {
        let jpeg = frame.jpeg()?.to_vec();
        let temp_dir = self.temp_dir.clone();
        tokio::task::spawn_blocking(move || write_temp_image(&jpeg, temp_dir.as_deref()))
            .await
            .map_err(|e| InferenceError::Io(std::io::Error::other(e)))?
    }

    async fn run(&self, image_path: &Path) -> InferenceResult<Vec<u8>> {
        debug!(
            program = %self.program.display(),
            image = %image_path.display(),
            "Running face analysis"
        );

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(image_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!("Face analysis timed out after {:?}, killing process", self.timeout);
                return Err(InferenceError::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InferenceError::Command(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

/// Unique `face-*.jpg` file, removed when the returned guard drops.
fn write_temp_image(jpeg: &[u8], dir: Option<&Path>) -> InferenceResult<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("face-").suffix(".jpg");
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    file.write_all(jpeg)?;
    file.flush()?;
    Ok(file)
}

#[async_trait]
impl EmotionAnalyzer for FaceAnalysisCommand {
    async fn analyze(&self, frame: &Frame) -> InferenceResult<EmotionScores> {
        let file = self.persist(frame).await?;
        let stdout = self.run(file.path()).await?;
        parse_face_analysis(&stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn frame() -> Frame {
        Frame::from_rgb(RgbImage::from_pixel(6, 6, Rgb([200, 180, 160])))
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn test_temp_image_written_and_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg = frame().jpeg().unwrap().to_vec();

        let file = write_temp_image(&jpeg, Some(dir.path())).unwrap();
        let path = file.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), jpeg);
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        drop(file);
        assert!(!path.exists());
        assert!(dir_is_empty(dir.path()));
    }

    #[test]
    fn test_missing_program() {
        let result = FaceAnalysisCommand::new("definitely-not-a-face-analyzer");
        assert!(matches!(result, Err(InferenceError::CommandNotFound(_))));
    }

    #[tokio::test]
    async fn test_analyze_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FaceAnalysisCommand::new("sh")
            .unwrap()
            .with_args([
                "-c",
                r#"test -s "$0" && echo '[{"emotion": {"happy": 0.2, "sad": 0.7, "angry": 0.1}}]'"#,
            ])
            .with_temp_dir(dir.path());

        let scores = analyzer.analyze(&frame()).await.unwrap();
        assert_eq!(scores.dominant(), Some("sad"));
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_failure_still_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FaceAnalysisCommand::new("sh")
            .unwrap()
            .with_args(["-c", "echo 'no face' >&2; exit 3"])
            .with_temp_dir(dir.path());

        let result = analyzer.analyze(&frame()).await;
        assert!(matches!(result, Err(InferenceError::Command(_))));
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FaceAnalysisCommand::new("sh")
            .unwrap()
            .with_args(["-c", "sleep 5"])
            .with_temp_dir(dir.path())
            .with_timeout(Duration::from_millis(100));

        let result = analyzer.analyze(&frame()).await;
        assert!(matches!(result, Err(InferenceError::Timeout(_))));
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_concurrent_calls_use_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let analyzer = FaceAnalysisCommand::new("sh")
            .unwrap()
            .with_args(["-c", r#"printf '{"emotion": {"%s": 1.0}}' "$(basename "$0")""#])
            .with_temp_dir(dir.path());

        let a = frame();
        let b = frame();
        let (first, second) = tokio::join!(analyzer.analyze(&a), analyzer.analyze(&b));
        let first = first.unwrap().dominant().unwrap().to_string();
        let second = second.unwrap().dominant().unwrap().to_string();
        assert!(first.starts_with("face-") && first.ends_with(".jpg"));
        assert_ne!(first, second);
    }
}
