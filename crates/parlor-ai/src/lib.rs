//! AI reply client.
//!
//! One prompt in, one completion out. No conversation history, no system
//! prompt, no streaming. The provider sits behind [`AiReplier`] so it can be
//! swapped through configuration.

pub mod gemini;
pub mod openai;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

pub use gemini::GeminiReplier;
pub use openai::OpenAiReplier;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Provider returned an empty reply")]
    EmptyReply,
}

/// Produces a text reply for a single prompt.
#[async_trait]
pub trait AiReplier: Send + Sync {
    async fn reply(&self, prompt: &str) -> Result<String, AiError>;

    /// Provider name, for logs.
    fn provider(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiProvider {
    #[default]
    Gemini,
    OpenAi,
}

impl AiProvider {
    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini-2.0-flash",
            AiProvider::OpenAi => "gpt-4o-mini",
        }
    }

    /// Environment variable holding the API key for this provider.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "GEMINI_API_KEY",
            AiProvider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(AiProvider::Gemini),
            "openai" => Ok(AiProvider::OpenAi),
            other => Err(format!("unknown AI provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: Option<String>,
    pub api_base: Option<String>,
}

/// Build the configured replier on top of a shared HTTP client.
pub fn build_replier(config: AiConfig, client: Client) -> Arc<dyn AiReplier> {
    let model = config
        .model
        .unwrap_or_else(|| config.provider.default_model().to_string());

    match config.provider {
        AiProvider::Gemini => Arc::new(GeminiReplier::new(client, config.api_key, config.api_base, model)),
        AiProvider::OpenAi => Arc::new(OpenAiReplier::new(client, config.api_key, config.api_base, model)),
    }
}

/// Reject blank completions so callers never persist an empty reply.
fn non_empty(text: Option<&str>) -> Result<String, AiError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.to_string()),
        _ => Err(AiError::EmptyReply),
    }
}
