//! Image model handlers.
//!
//! Every handler takes a multipart upload with the image in the `file`
//! field. Decoding and other CPU-bound image work runs on the blocking pool.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use lens_inference::{imagenet_tensor, Frame, ImageTensor, InferenceError};
use lens_models::{AnalysisResult, CaptionResponse, PredictionResponse};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::services::bounded_call;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const NO_FILE: &str = "No file provided";

/// Read the bytes of the `file` field. Other fields are skipped.
async fn read_upload(multipart: Result<Multipart, MultipartRejection>) -> ApiResult<Bytes> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Rejected multipart body: {}", rejection.body_text());
        ApiError::validation(NO_FILE)
    })?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;
        if bytes.is_empty() {
            break;
        }
        return Ok(bytes);
    }

    Err(ApiError::validation(NO_FILE))
}

/// Run CPU-bound image work off the async runtime.
async fn blocking<T, F>(work: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ApiResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::internal(format!("Image task failed: {}", e)))?
}

fn decode(bytes: &[u8]) -> ApiResult<Frame> {
    Frame::decode(bytes).map_err(|e| match e {
        InferenceError::Image(e) => ApiError::invalid_image(e.to_string()),
        other => ApiError::Collaborator(other),
    })
}

/// Decode the upload and encode its JPEG form up front.
async fn decode_for_upload(bytes: Bytes) -> ApiResult<Frame> {
    blocking(move || {
        let frame = decode(&bytes)?;
        if let Err(e) = frame.jpeg() {
            warn!("JPEG encoding failed: {}", e);
        }
        Ok(frame)
    })
    .await
}

/// Classify an image into one ImageNet label.
pub async fn classify_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    let bytes = read_upload(multipart).await?;

    let tensor: ImageTensor = blocking(move || {
        let frame = decode(&bytes)?;
        Ok(imagenet_tensor(frame.rgb()))
    })
    .await?;

    let logits = bounded_call(
        "classifier",
        state.config.collaborator_deadline(),
        state.models.classifier.logits(&tensor),
    )
    .await?;
    let prediction = state.labels.top_label(&logits)?.to_string();

    info!(prediction = %prediction, "Image classified");
    Ok(Json(PredictionResponse { prediction }))
}

/// Generate a natural-language caption for an image.
pub async fn explain_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<CaptionResponse>> {
    let bytes = read_upload(multipart).await?;
    let frame = decode_for_upload(bytes).await?;

    let caption = bounded_call(
        "captioner",
        state.config.collaborator_deadline(),
        state.models.captioner.caption(&frame),
    )
    .await?;

    info!(caption = %caption, "Image explained");
    Ok(Json(CaptionResponse { caption }))
}

/// Caption, mood and activity for one camera frame.
///
/// Only an undecodable upload fails the request; collaborator failures show
/// up as `"unknown"` fields.
pub async fn analyze_camera_feed(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let bytes = read_upload(multipart).await?;
    let frame = decode_for_upload(bytes).await?;

    let (width, height) = frame.dimensions();
    let result = state.analyzer.analyze(&frame).await;

    info!(
        width,
        height,
        mood = %result.mood,
        activity = %result.activity,
        "Camera feed analyzed"
    );
    Ok(Json(result))
}
