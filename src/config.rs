// src/config.rs
use std::{env, fmt, time::Duration};

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_CLERK_API_BASE: &str = "https://api.clerk.dev";
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Clone)]
pub struct Config {
    pub clerk_frontend_api: Option<String>,
    pub clerk_api_key: Option<String>,
    pub clerk_publishable_key: String,
    pub clerk_api_base: String,
    pub openai_api_key: String,
    pub openai_api_base: String,
    pub model: String,
    pub host: String,
    pub port: u16,
    pub verify_timeout: Duration,
    pub llm_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clerk_frontend_api: None,
            clerk_api_key: None,
            clerk_publishable_key: String::new(),
            clerk_api_base: DEFAULT_CLERK_API_BASE.to_string(),
            openai_api_key: String::new(),
            openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            verify_timeout: Duration::from_secs(10),
            llm_timeout: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Reads the process environment. `.env` is loaded by the binary beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let openai_api_key = get("OPENAI_API_KEY").unwrap_or_default();
        if openai_api_key.is_empty() {
            warn!("OPENAI_API_KEY is not set, LLM calls will be rejected upstream");
        }

        Ok(Self {
            clerk_frontend_api: get("CLERK_FRONTEND_API"),
            clerk_api_key: get("CLERK_API_KEY"),
            clerk_publishable_key: get("CLERK_PUBLISHABLE_KEY").unwrap_or_default(),
            clerk_api_base: get("CLERK_API_BASE").unwrap_or(defaults.clerk_api_base),
            openai_api_key,
            openai_api_base: get("OPENAI_API_BASE").unwrap_or(defaults.openai_api_base),
            model: get("OPENAI_MODEL").unwrap_or(defaults.model),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            verify_timeout: parse_or("CLERK_TIMEOUT_SECS", get("CLERK_TIMEOUT_SECS"), 10)
                .map(Duration::from_secs)?,
            llm_timeout: parse_or("OPENAI_TIMEOUT_SECS", get("OPENAI_TIMEOUT_SECS"), 60)
                .map(Duration::from_secs)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

// Keys stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |set: bool| if set { "<redacted>" } else { "<unset>" };
        f.debug_struct("Config")
            .field("clerk_frontend_api", &self.clerk_frontend_api)
            .field("clerk_api_key", &redact(self.clerk_api_key.is_some()))
            .field("clerk_publishable_key", &self.clerk_publishable_key)
            .field("clerk_api_base", &self.clerk_api_base)
            .field("openai_api_key", &redact(!self.openai_api_key.is_empty()))
            .field("openai_api_base", &self.openai_api_base)
            .field("model", &self.model)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("verify_timeout", &self.verify_timeout)
            .field("llm_timeout", &self.llm_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
        assert_eq!(cfg.model, "gpt-3.5-turbo");
        assert_eq!(cfg.clerk_api_base, DEFAULT_CLERK_API_BASE);
        assert!(cfg.clerk_api_key.is_none());
    }

    #[test]
    fn reads_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("CLERK_PUBLISHABLE_KEY", "pk_test_123"),
            ("PORT", "9000"),
            ("OPENAI_TIMEOUT_SECS", "5"),
            ("HOST", ""),
        ]))
        .unwrap();
        assert_eq!(cfg.openai_api_key, "sk-test");
        assert_eq!(cfg.clerk_publishable_key, "pk_test_123");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.llm_timeout, Duration::from_secs(5));
        assert_eq!(cfg.host, "0.0.0.0");
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn debug_hides_secrets() {
        let cfg = Config {
            openai_api_key: "sk-very-secret".to_string(),
            clerk_api_key: Some("sk_clerk_secret".to_string()),
            ..Config::default()
        };
        let printed = format!("{:?}", cfg);
        assert!(!printed.contains("sk-very-secret"));
        assert!(!printed.contains("sk_clerk_secret"));
        assert!(printed.contains("<redacted>"));
    }
}
