// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::llm_client::{LlmClient, OpenAiClient};
use crate::services::token_verifier::{ClerkTokenVerifier, TokenVerifier};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub llm: Arc<dyn LlmClient>,
}

impl AppState {
    pub fn new(
        config: Config,
        verifier: Arc<dyn TokenVerifier>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            verifier,
            llm,
        }
    }

    /// Wires the Clerk verifier and OpenAI client from config.
    pub fn from_config(config: Config) -> reqwest::Result<Self> {
        let verifier = ClerkTokenVerifier::new(&config.clerk_api_base, config.verify_timeout)?;
        let llm = OpenAiClient::new(
            &config.openai_api_base,
            &config.openai_api_key,
            &config.model,
            config.llm_timeout,
        )?;
        Ok(Self::new(config, Arc::new(verifier), Arc::new(llm)))
    }
}
