pub mod config;
pub mod error;
pub mod server;
pub mod summarize;
pub mod transcript;
pub mod youtube;

use crate::error::ApiError;

/// A single timed caption line
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFragment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl CaptionFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: 0.0,
            duration: 0.0,
        }
    }
}

/// Extract the video ID from a youtu.be link or a `v=` query URL.
///
/// Short links win over query links. The extracted ID is not validated; a bad
/// ID only shows up once the caption backend rejects it.
pub fn extract_video_id(url: &str) -> Result<String, ApiError> {
    if url.contains("youtu.be") {
        // rsplit always yields at least one item
        let id = url.rsplit('/').next().unwrap_or_default();
        return Ok(id.to_string());
    }

    if let Some((_, rest)) = url.split_once("v=") {
        let id = rest.split('&').next().unwrap_or_default();
        return Ok(id.to_string());
    }

    Err(ApiError::InvalidLink)
}
