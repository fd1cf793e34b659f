//! Text model handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use lens_models::{MoodResponse, SentimentCategory, SummaryResponse, TextRequest};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::services::bounded_call;
use crate::state::AppState;

const NO_TEXT: &str = "No text provided";

/// Extract non-blank text from the request body.
fn require_text(body: Result<Json<TextRequest>, JsonRejection>) -> ApiResult<String> {
    let Json(request) = body.map_err(|rejection| {
        debug!("Rejected text body: {}", rejection.body_text());
        ApiError::validation(NO_TEXT)
    })?;
    request
        .non_empty_text()
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation(NO_TEXT))
}

/// Classify the sentiment of a text into a mood category.
pub async fn detect_mood(
    State(state): State<AppState>,
    body: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<Json<MoodResponse>> {
    let text = require_text(body)?;

    let polarity = state.models.sentiment.polarity(&text);
    let mood = SentimentCategory::from_polarity(polarity);

    info!(polarity, mood = %mood, "Mood detected");
    Ok(Json(MoodResponse { mood }))
}

/// Produce an abstractive summary of a text.
pub async fn summarize_text(
    State(state): State<AppState>,
    body: Result<Json<TextRequest>, JsonRejection>,
) -> ApiResult<Json<SummaryResponse>> {
    let text = require_text(body)?;
    let params = &state.config.summary;

    let summary = bounded_call(
        "summarizer",
        state.config.collaborator_deadline(),
        state.models.summarizer.summarize(&text, params),
    )
    .await?;

    info!(input_chars = text.len(), summary_chars = summary.len(), "Text summarized");
    Ok(Json(SummaryResponse { summary }))
}
