use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::account::Credentials;
use crate::search::PipelineConfig;

const DEFAULT_DIRECTORY_URL: &str = "http://localhost:8000";

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable does not parse.
#[derive(Clone)]
pub struct Config {
    pub directory_url: String,
    pub debounce: Duration,
    pub request_timeout: Duration,
    /// Pre-issued bearer token. Takes precedence over email/password.
    pub token: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            directory_url: non_empty("DIRECTORY_URL")
                .unwrap_or_else(|| DEFAULT_DIRECTORY_URL.to_string()),
            debounce: Duration::from_millis(
                parse_or(non_empty("SEARCH_DEBOUNCE_MS"), 500)
                    .context("SEARCH_DEBOUNCE_MS must be a whole number of milliseconds")?,
            ),
            request_timeout: Duration::from_secs(
                parse_or(non_empty("REQUEST_TIMEOUT_SECS"), 30)
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            token: non_empty("TRACE_TOKEN"),
            email: non_empty("TRACE_EMAIL"),
            password: lookup("TRACE_PASSWORD"),
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Login credentials, when both halves are configured.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.email, &self.password) {
            (Some(email), Some(password)) => Some(Credentials {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            quiet_period: self.debounce,
            ..PipelineConfig::default()
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("directory_url", &self.directory_url)
            .field("debounce", &self.debounce)
            .field("request_timeout", &self.request_timeout)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("rust_log", &self.rust_log)
            .finish_non_exhaustive()
    }
}

fn parse_or(raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        Some(v) => Ok(v.trim().parse::<u64>()?),
        None => Ok(default),
    }
}
