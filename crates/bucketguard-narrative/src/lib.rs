//! Narrative summaries of scan and remediation results.
//!
//! This crate performs network IO. Its public entry points never return errors.

#![forbid(unsafe_code)]

mod gemini;
mod prompt;

pub use gemini::{GeminiConfig, GeminiNarrator};
pub use prompt::{build_prompt, NarrativeInput};

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum NarrativeError {
    #[error("{0} not configured")]
    MissingCredential(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("model endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model response contained no text")]
    EmptyResponse,
}

/// Something that turns a prompt into text.
pub trait Narrator {
    fn generate(&self, prompt: &str) -> Result<String, NarrativeError>;
}

pub fn skipped_placeholder(api_key_env: &str) -> String {
    format!("AI analysis skipped: {api_key_env} not configured")
}

pub fn failed_placeholder(err: &NarrativeError) -> String {
    format!("AI analysis failed: {err}")
}

/// Run `narrator` over `input`. Failures become the "failed" placeholder.
pub fn summarize(narrator: &dyn Narrator, input: &NarrativeInput) -> String {
    let prompt = build_prompt(input);
    match narrator.generate(&prompt) {
        Ok(text) => text.trim().to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "narrative generation failed");
            failed_placeholder(&err)
        }
    }
}

/// Summarize with Gemini. A missing `api_key` yields the "skipped" placeholder without any
/// network call.
pub fn summarize_with_gemini(
    config: &GeminiConfig,
    api_key: Option<String>,
    input: &NarrativeInput,
) -> String {
    let Some(api_key) = api_key.filter(|k| !k.trim().is_empty()) else {
        tracing::info!(env = %config.api_key_env, "narrative skipped: no api key");
        return skipped_placeholder(&config.api_key_env);
    };
    match GeminiNarrator::new(config.clone(), api_key) {
        Ok(narrator) => summarize(&narrator, input),
        Err(err) => {
            tracing::warn!(error = %err, "narrative client setup failed");
            failed_placeholder(&err)
        }
    }
}

/// Read the API key named by `env_var`; blank values count as missing.
pub fn api_key_from_env(env_var: &str) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
