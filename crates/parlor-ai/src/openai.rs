use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

use crate::{AiError, AiReplier, non_empty};

/// OpenAI-compatible chat completions client.
/// Works with any endpoint that speaks `/chat/completions`.
pub struct OpenAiReplier {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiReplier {
    pub fn new(client: Client, api_key: String, api_base: Option<String>, model: String) -> Self {
        let base = api_base.unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        Self {
            client,
            api_key,
            api_base: base.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl AiReplier for OpenAiReplier {
    async fn reply(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/chat/completions", self.api_base);

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        debug!("OpenAI request with model {}", self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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
        "openai"
    }
}

fn parse_response(data: &Value) -> Result<String, AiError> {
    let message = data
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|c| c.get("message"))
        .ok_or_else(|| AiError::Parse("No choices in response".to_string()))?;

    non_empty(message.get("content").and_then(|c| c.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_first_choice() {
        let data = json!({
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": "Hi!" } }]
        });
        assert_eq!(parse_response(&data).unwrap(), "Hi!");
    }

    #[test]
    fn missing_choices_is_parse_error() {
        assert!(matches!(parse_response(&json!({})), Err(AiError::Parse(_))));
    }

    #[test]
    fn null_content_is_empty_reply() {
        let data = json!({ "choices": [{ "message": { "role": "assistant", "content": null } }] });
        assert!(matches!(parse_response(&data), Err(AiError::EmptyReply)));
    }
}
