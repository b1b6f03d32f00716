use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::CaptionFragment;
use crate::transcript::{CaptionBackend, CaptionError};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Caption backend reading YouTube's built-in captions via the InnerTube API
#[derive(Debug, Clone, Default)]
pub struct YouTubeCaptions {
    client: reqwest::Client,
}

impl YouTubeCaptions {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn list_tracks(&self, video_id: &str, lang: &str) -> Result<Vec<CaptionTrack>, CaptionError> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");

        let page_html = self
            .client
            .get(&watch_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(resp
            .captions
            .and_then(|c| c.player_captions_tracklist_renderer)
            .and_then(|r| r.caption_tracks)
            .unwrap_or_default())
    }
}

#[async_trait]
impl CaptionBackend for YouTubeCaptions {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Vec<CaptionFragment>, CaptionError> {
        let hl = languages.first().map(String::as_str).unwrap_or("en");
        let tracks = self.list_tracks(video_id, hl).await?;
        let track = select_track(&tracks, video_id, languages)?;
        debug!("Using caption track: lang={}", track.language_code);

        // Step 3: Fetch the caption XML
        let caption_xml = self
            .client
            .get(&track.base_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_caption_xml(&caption_xml)
    }
}

/// Pick the first track matching the preference order
fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    video_id: &str,
    languages: &[String],
) -> Result<&'a CaptionTrack, CaptionError> {
    if tracks.is_empty() {
        return Err(CaptionError::TranscriptsDisabled(video_id.to_string()));
    }

    languages
        .iter()
        .find_map(|lang| tracks.iter().find(|t| &t.language_code == lang))
        .ok_or_else(|| CaptionError::NoTranscriptFound {
            video_id: video_id.to_string(),
            languages: languages.to_vec(),
        })
}

fn extract_api_key(html: &str) -> Result<String, CaptionError> {
    let patterns = [r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#, r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#];

    for pattern in patterns {
        let re = Regex::new(pattern).map_err(|e| CaptionError::Parse(e.to_string()))?;
        if let Some(caps) = re.captures(html) {
            return Ok(caps[1].to_string());
        }
    }

    Err(CaptionError::Parse(
        "could not extract InnerTube API key from watch page".to_string(),
    ))
}

fn parse_caption_xml(xml: &str) -> Result<Vec<CaptionFragment>, CaptionError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut fragments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                current_start = None;
                current_dur = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                    match attr.key.as_ref() {
                        b"start" => current_start = value,
                        b"dur" => current_dur = value,
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                // dur is optional on the last line of some tracks
                if let Some(start) = current_start.take() {
                    let duration = current_dur.take().unwrap_or_default();
                    // Entities quick-xml rejects (&nbsp; and friends) are left to html_escape
                    let raw_text = match e.unescape() {
                        Ok(unescaped) => unescaped.into_owned(),
                        Err(_) => String::from_utf8_lossy(e).into_owned(),
                    };
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.is_empty() {
                        fragments.push(CaptionFragment { text, start, duration });
                    }
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => {
                // an empty <text></text> must not adopt the whitespace that follows it
                current_start = None;
                current_dur = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(CaptionError::Parse(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(fragments)
}
