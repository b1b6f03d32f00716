use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Request-terminating failures of the summary endpoint.
///
/// Every variant maps to one HTTP status and a `detail` message the caller can
/// show as-is.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The URL matched neither a short link nor a `v=` query.
    #[error("Invalid YouTube link. Please enter a valid link.")]
    InvalidLink,

    /// The caption backend failed for any reason the language fallback did not cover.
    #[error("Error fetching transcript: {0}. Please check the video URL or try another video.")]
    TranscriptFetch(String),

    /// Captions were fetched but held no text.
    #[error("Transcript not found")]
    TranscriptNotFound,

    /// The language model call failed.
    #[error("Error generating summary: {0}")]
    Summarization(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidLink => StatusCode::BAD_REQUEST,
            ApiError::TranscriptNotFound => StatusCode::NOT_FOUND,
            ApiError::TranscriptFetch(_) | ApiError::Summarization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidLink => "INVALID_LINK",
            ApiError::TranscriptFetch(_) => "TRANSCRIPT_FETCH_FAILED",
            ApiError::TranscriptNotFound => "TRANSCRIPT_NOT_FOUND",
            ApiError::Summarization(_) => "SUMMARIZATION_FAILED",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "detail": self.to_string(),
            "code": self.code(),
        });

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_categories() {
        assert_eq!(ApiError::InvalidLink.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::TranscriptNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::TranscriptFetch("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Summarization("quota".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_fetch_message_wraps_backend_message() {
        let err = ApiError::TranscriptFetch("transcripts are disabled for video abc".into());
        assert_eq!(
            err.to_string(),
            "Error fetching transcript: transcripts are disabled for video abc. \
             Please check the video URL or try another video."
        );
    }

    #[test]
    fn test_summarization_message() {
        let err = ApiError::Summarization("Gemini API returned 429".into());
        assert_eq!(err.to_string(), "Error generating summary: Gemini API returned 429");
    }
}
