// src/services/token_verifier.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Decides whether a bearer token belongs to a live session.
///
/// Implementations never fail outward: every problem is a `false`.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> bool;
}

/// Checks tokens against Clerk's current-user endpoint.
#[derive(Debug, Clone)]
pub struct ClerkTokenVerifier {
    client: Client,
    api_base: String,
}

impl ClerkTokenVerifier {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn me_url(&self) -> String {
        format!("{}/v1/me", self.api_base)
    }
}

#[async_trait]
impl TokenVerifier for ClerkTokenVerifier {
    async fn verify(&self, token: &str) -> bool {
        if token.is_empty() {
            warn!("Clerk verification skipped: empty token");
            return false;
        }

        match self.client.get(self.me_url()).bearer_auth(token).send().await {
            Ok(resp) if resp.status() == StatusCode::OK => {
                debug!("Clerk token accepted");
                true
            }
            Ok(resp) => {
                warn!("Clerk rejected token with status {}", resp.status());
                false
            }
            Err(e) => {
                warn!("Clerk verification error: {}", e);
                false
            }
        }
    }
}
