use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;

/// Instructions placed in front of every transcript
pub const BASE_PROMPT: &str = "
You are an expert summarizer for YouTube videos. Your task is to create a clear and insightful summary based on the transcript. Include:

1. **Key Points**: Main ideas discussed.
2. **Conclusions**: Important takeaways or recommendations.
3. **Insights**: Notable facts, figures, or unique ideas shared.

Here is the transcript to summarize:
";

/// Target summary length in words
pub const SUMMARY_LENGTH: u32 = 400;

/// Layout requested from the model
pub const SUMMARY_FORMAT: SummaryFormat = SummaryFormat::Paragraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    BulletPoints,
    Paragraph,
}

/// Build the instruction prefix for the given format and word budget.
pub fn build_prompt(format: SummaryFormat, length: u32) -> String {
    let clause = match format {
        SummaryFormat::BulletPoints => {
            format!(" Summarize in bullet points, keeping within {length} words.")
        }
        SummaryFormat::Paragraph => {
            format!(" Provide a single coherent paragraph, strictly avoiding bullet points and within {length} words.")
        }
    };
    format!("{BASE_PROMPT}{clause}")
}

/// A text-in, text-out language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Summarize a transcript: the prompt and transcript are sent back to back,
/// untruncated, and the reply is trimmed.
pub async fn summarize(model: &dyn LanguageModel, transcript_text: &str, prompt: &str) -> Result<String> {
    let full_prompt = format!("{prompt}{transcript_text}");
    debug!("Submitting prompt of {} bytes", full_prompt.len());
    let response = model.generate(&full_prompt).await?;
    Ok(response.trim().to_string())
}

/// Hosted LLM vendor, chosen from the model name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Anthropic,
    OpenAi,
}

impl Provider {
    pub fn for_model(model: &str) -> Self {
        if model.starts_with("gemini") {
            Provider::Gemini
        } else if model.starts_with("claude") {
            Provider::Anthropic
        } else {
            Provider::OpenAi
        }
    }

    /// Environment variable holding this provider's credential
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GOOGLE_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Anthropic => "Anthropic",
            Provider::OpenAi => "OpenAI",
        }
    }
}

/// HTTP client for the hosted model APIs
#[derive(Debug, Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    provider: Provider,
    model: String,
    api_key: String,
}

impl LlmClient {
    pub fn new(client: reqwest::Client, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            client,
            provider: Provider::for_model(&model),
            model,
            api_key: api_key.into(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_gemini(&self, prompt: &str) -> Result<String> {
        debug!("Summarizing via Gemini API with model {}", self.model);

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );

        let body = serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        });

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let json = self.check_response(resp).await?;
        extract_gemini_text(&json)
    }

    async fn generate_anthropic(&self, prompt: &str) -> Result<String> {
        debug!("Summarizing via Anthropic API with model {}", self.model);

        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": 4096,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let resp = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let json = self.check_response(resp).await?;
        extract_anthropic_text(&json)
    }

    async fn generate_openai(&self, prompt: &str) -> Result<String> {
        debug!("Summarizing via OpenAI API with model {}", self.model);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ]
        });

        let resp = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let json = self.check_response(resp).await?;
        extract_openai_text(&json)
    }

    async fn check_response(&self, resp: reqwest::Response) -> Result<serde_json::Value> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("{} API returned {status}: {body}", self.provider.name());
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match self.provider {
            Provider::Gemini => self.generate_gemini(prompt).await,
            Provider::Anthropic => self.generate_anthropic(prompt).await,
            Provider::OpenAi => self.generate_openai(prompt).await,
        }
    }
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    bail!("unexpected Gemini API response format");
}

fn extract_anthropic_text(json: &serde_json::Value) -> Result<String> {
    if let Some(content) = json.get("content").and_then(|c| c.as_array()) {
        let text: String = content
            .iter()
            .filter_map(|block| {
                if block.get("type")?.as_str()? == "text" {
                    block.get("text")?.as_str()
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }
    bail!("unexpected Anthropic API response format");
}

fn extract_openai_text(json: &serde_json::Value) -> Result<String> {
    if let Some(text) = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
    {
        return Ok(text.to_string());
    }
    bail!("unexpected OpenAI API response format");
}
