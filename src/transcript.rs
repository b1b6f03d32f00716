use async_trait::async_trait;
use log::{debug, info};

use crate::CaptionFragment;

/// Failures reported by a caption backend
#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    /// Captions exist, but none in any of the requested languages
    #[error("no transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound { video_id: String, languages: Vec<String> },

    #[error("transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Parse(String),
}

/// Source of timed captions for a video
#[async_trait]
pub trait CaptionBackend: Send + Sync {
    /// Fetch the captions of `video_id` in the first available language of `languages`.
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Vec<CaptionFragment>, CaptionError>;
}

/// Caption languages to try, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePreference {
    pub primary: String,
    pub secondary: String,
}

impl Default for LanguagePreference {
    fn default() -> Self {
        Self {
            primary: "en".to_string(),
            secondary: "hi".to_string(),
        }
    }
}

/// Fetch a transcript and join it into a single line of text.
///
/// Falls back to the secondary language once, and only when the primary
/// language has no transcript.
pub async fn fetch_transcript(
    backend: &dyn CaptionBackend,
    video_id: &str,
    prefs: &LanguagePreference,
) -> Result<String, CaptionError> {
    let fragments = match backend.fetch(video_id, std::slice::from_ref(&prefs.primary)).await {
        Ok(fragments) => fragments,
        Err(CaptionError::NoTranscriptFound { .. }) => {
            info!(
                "No '{}' transcript for {video_id}, trying '{}'",
                prefs.primary, prefs.secondary
            );
            backend.fetch(video_id, std::slice::from_ref(&prefs.secondary)).await?
        }
        Err(e) => return Err(e),
    };

    debug!("Fetched {} caption fragments for {video_id}", fragments.len());
    Ok(join_fragments(&fragments))
}

/// Join fragment texts with single spaces, keeping backend order
pub fn join_fragments(fragments: &[CaptionFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
