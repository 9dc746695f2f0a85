use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use crate::{AiError, AiReplier, non_empty};

/// Google Gemini `generateContent` client.
pub struct GeminiReplier {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiReplier {
    pub fn new(client: Client, api_key: String, api_base: Option<String>, model: String) -> Self {
        let base = api_base
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string());
        Self {
            client,
            api_key,
            api_base: base.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl AiReplier for GeminiReplier {
    async fn reply(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        debug!("Gemini request with model {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let data: Value = response.json().await?;
        parse_response(&data)
    }

    fn provider(&self) -> &str {
        "gemini"
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_response(data: &Value) -> Result<String, AiError> {
    let parts = data
        .get("candidates")
        .and_then(|v| v.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| AiError::Parse("No candidates in response".to_string()))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    non_empty(Some(text.as_str()))
}
