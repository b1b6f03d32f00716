use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::summarize::{LanguageModel, SUMMARY_FORMAT, SUMMARY_LENGTH, build_prompt, summarize};
use crate::transcript::{CaptionBackend, LanguagePreference, fetch_transcript};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub captions: Arc<dyn CaptionBackend>,
    pub llm: Arc<dyn LanguageModel>,
    pub languages: LanguagePreference,
}

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub youtube_video_url: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/generate_summary/", post(generate_summary))
        .with_state(state)
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn generate_summary(
    State(state): State<AppState>,
    Json(request): Json<VideoRequest>,
) -> Result<Response, ApiError> {
    let video_id = crate::extract_video_id(&request.youtube_video_url)?;
    info!("Summarizing video {video_id}");

    let transcript_text = fetch_transcript(state.captions.as_ref(), &video_id, &state.languages)
        .await
        .map_err(|e| ApiError::TranscriptFetch(e.to_string()))?;

    if transcript_text.trim().is_empty() {
        return Err(ApiError::TranscriptNotFound);
    }
    info!("Transcript for {video_id}: {} chars", transcript_text.chars().count());

    let prompt = build_prompt(SUMMARY_FORMAT, SUMMARY_LENGTH);
    let summary = summarize(state.llm.as_ref(), &transcript_text, &prompt)
        .await
        .map_err(|e| {
            error!("Error generating summary: {e}");
            ApiError::Summarization(e.to_string())
        })?;

    Ok(stream_summary(summary))
}

/// Send an already complete summary as a streamed plain-text body.
pub fn stream_summary(summary: String) -> Response {
    let stream = futures::stream::once(async move { Ok::<_, Infallible>(Bytes::from(summary)) });

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response()
}
