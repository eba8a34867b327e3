// src/services/mod.rs
pub mod chatbot;
pub mod llm_client;
pub mod token_verifier;
