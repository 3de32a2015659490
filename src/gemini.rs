use crate::config::{http_client, GeminiConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, error};

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("Gemini API returned status {status}: {body}")] Status { status: u16, body: String },
    #[error("Failed to parse response: {0}")] Decode(String),
    #[error("No text content found in response")] EmptyResponse,
    #[error("GEMINI_API_KEY is not configured")] NotConfigured,
}

/// Text-in/text-out model seam. One call, no retries; errors go straight back to the caller.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, GeminiError>;
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Self {
        let client = http_client(config.timeout, "Gemini");
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::NotConfigured)?;

        let url = format!("{}/models/{}:generateContent?key={}", self.base_url, self.model, api_key);
        info!("🔗 Making request to: {}", url.replace(api_key, "***"));

        let payload = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }]
        });

        let response = self.client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| GeminiError::Http(e.to_string()))?;

        if !status.is_success() {
            error!("❌ Gemini API text generation failed with status {}: {}", status, preview(&response_text, 500));
            return Err(GeminiError::Status { status: status.as_u16(), body: response_text });
        }

        info!("📥 Raw Gemini API response: {}", preview(&response_text, 1000));

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Decode(e.to_string()))?;

        first_text(&parsed).ok_or(GeminiError::EmptyResponse)
    }
}

/// Shortens long payloads for log lines.
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...[{} chars total]", &text[..cut], text.chars().count()),
        None => text.to_string(),
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Other(serde::de::IgnoredAny),
}

/// Joins the text parts of the first candidate that has any.
fn first_text(resp: &GeminiResponse) -> Option<String> {
    resp.candidates.iter().find_map(|c| {
        let texts: Vec<&str> = c.content.parts.iter().filter_map(|p| match p {
            Part::Text { text } => Some(text.as_str()),
            Part::Other(_) => None,
        }).collect();
        if texts.is_empty() { None } else { Some(texts.concat()) }
    })
}
