// src/services/llm_client.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::chatbot::ChatMessage;
use crate::error::LlmError;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ProviderResponse, LlmError>;
}

/// What came back from the provider, parsed into the fields a reply can come from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub content: Option<String>,
    pub text: Option<String>,
    pub raw: Value,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ProviderResponse {
    /// Picks out the first choice's chat `content` and legacy `text`.
    /// A body of unexpected shape keeps only `raw`.
    pub fn from_value(raw: Value) -> Self {
        let body: CompletionBody = serde_json::from_value(raw.clone()).unwrap_or_default();
        let first = body.choices.into_iter().next().unwrap_or_default();
        Self {
            content: first.message.and_then(|m| m.content),
            text: first.text,
            raw,
        }
    }

    /// `content`, else `text`, else the whole response as a string.
    pub fn reply_text(&self) -> String {
        [&self.content, &self.text]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .cloned()
            .unwrap_or_else(|| self.raw.to_string())
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// OpenAI chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let model = model.into();
        info!("LLM client: model={}", model);
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn invoke(&self, messages: &[ChatMessage]) -> Result<ProviderResponse, LlmError> {
        debug!("Calling LLM with {} messages", messages.len());

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let raw: Value =
            serde_json::from_slice(&bytes).map_err(|e| LlmError::Decode(e.to_string()))?;
        Ok(ProviderResponse::from_value(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefers_chat_content() {
        let resp = ProviderResponse::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Drink water." }, "text": "ignored" }]
        }));
        assert_eq!(resp.reply_text(), "Drink water.");
    }

    #[test]
    fn falls_back_to_text_field() {
        let resp = ProviderResponse::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null }, "text": "Rest." }]
        }));
        assert_eq!(resp.content, None);
        assert_eq!(resp.reply_text(), "Rest.");
    }

    #[test]
    fn empty_content_is_skipped() {
        let resp = ProviderResponse::from_value(json!({
            "choices": [{ "message": { "content": "" }, "text": "From text." }]
        }));
        assert_eq!(resp.reply_text(), "From text.");
    }

    #[test]
    fn unknown_shape_uses_raw_string() {
        let raw = json!({ "id": "cmpl-1", "choices": [] });
        let resp = ProviderResponse::from_value(raw.clone());
        assert_eq!(resp.reply_text(), raw.to_string());

        let odd = ProviderResponse::from_value(json!("just a string"));
        assert_eq!(odd.reply_text(), "\"just a string\"");
    }
}
