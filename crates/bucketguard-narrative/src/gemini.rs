//! Gemini `generateContent` REST client.

use crate::{NarrativeError, Narrator, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeminiConfig {
    /// Base URL up to and including the API version, without a trailing slash.
    pub endpoint: String,
    pub model: String,
    /// Environment variable the key is read from; used in the "skipped" placeholder.
    pub api_key_env: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GeminiConfig {
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Concatenated text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, NarrativeError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(NarrativeError::EmptyResponse);
    }
    Ok(text)
}

pub struct GeminiNarrator {
    config: GeminiConfig,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl GeminiNarrator {
    pub fn new(config: GeminiConfig, api_key: String) -> Result<Self, NarrativeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }
}

impl Narrator for GeminiNarrator {
    fn generate(&self, prompt: &str) -> Result<String, NarrativeError> {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };
        tracing::debug!(model = %self.config.model, "requesting narrative");

        let response = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(NarrativeError::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        extract_text(response.json::<GenerateResponse>()?)
    }
}
