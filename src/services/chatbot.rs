// src/services/chatbot.rs
use serde::{Deserialize, Serialize};
use tracing::info;

use super::llm_client::LlmClient;
use crate::error::LlmError;

pub const SYSTEM_PROMPT: &str = "You are MedAssist, a trusted medical assistant chatbot. \
Provide accurate, safe, non-diagnostic medical information, \
and suggest seeing a doctor when appropriate.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

// One system instruction, then the user's text. Nothing carries over between calls.
pub fn build_messages(user_msg: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::new(Role::System, SYSTEM_PROMPT),
        ChatMessage::new(Role::User, user_msg),
    ]
}

pub async fn generate_reply(llm: &dyn LlmClient, user_msg: &str) -> Result<String, LlmError> {
    let messages = build_messages(user_msg);
    let response = llm.invoke(&messages).await?;
    let reply = response.reply_text();
    info!("AI Reply: {}", reply);
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_system_then_user() {
        let messages = build_messages("What helps a headache?");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.starts_with("You are MedAssist"));
        assert!(messages[0].content.ends_with("suggest seeing a doctor when appropriate."));
        assert_eq!(messages[1], ChatMessage::new(Role::User, "What helps a headache?"));
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_value(ChatMessage::new(Role::Assistant, "ok")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "ok");
    }
}
