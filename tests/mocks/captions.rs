use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ytsum::CaptionFragment;
use ytsum::transcript::{CaptionBackend, CaptionError};

/// What the mock answers for a given language
#[derive(Clone)]
pub enum Reply {
    Fragments(Vec<String>),
    NotFound,
    Disabled,
}

#[derive(Clone)]
pub struct MockCaptions {
    pub replies: Vec<(String, Reply)>,
    pub calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl MockCaptions {
    /// Serve `texts` for every language
    pub fn new(texts: &[&str]) -> Self {
        Self::with_replies(vec![("*", Reply::Fragments(texts.iter().map(|t| t.to_string()).collect()))])
    }

    pub fn with_replies(replies: Vec<(&str, Reply)>) -> Self {
        Self {
            replies: replies.into_iter().map(|(l, r)| (l.to_string(), r)).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptionBackend for MockCaptions {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Vec<CaptionFragment>, CaptionError> {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.to_vec()));

        let reply = languages
            .iter()
            .find_map(|lang| {
                self.replies
                    .iter()
                    .find(|(l, _)| l == lang || l == "*")
                    .map(|(_, r)| r.clone())
            })
            .unwrap_or(Reply::NotFound);

        match reply {
            Reply::Fragments(texts) => Ok(texts.into_iter().map(CaptionFragment::new).collect()),
            Reply::NotFound => Err(CaptionError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
            }),
            Reply::Disabled => Err(CaptionError::TranscriptsDisabled(video_id.to_string())),
        }
    }
}
