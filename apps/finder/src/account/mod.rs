//! Account collaborators: credential exchange and profile maintenance.
//!
//! The bearer token obtained here is carried explicitly as an `AuthContext`
//! into every client that needs it. Nothing reads it from ambient storage.

pub mod auth;
pub mod profile;

use std::fmt;

use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub use auth::{AuthClient, Credentials, SignupForm};
pub use profile::ProfileClient;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service refused the request; `detail` is shown to the user verbatim.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    /// A local check failed before anything was sent.
    #[error("{0}")]
    Validation(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Session-scoped bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    token: String,
}

impl AuthContext {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    #[cfg(test)]
    pub fn token(&self) -> &str {
        &self.token
    }

    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.token)
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    detail: Option<Value>,
}

/// Builds a `Rejected` error from a non-success body, preferring the
/// service's `detail` message and falling back to `fallback`.
pub(crate) fn rejection(status: u16, body: &str, fallback: &str) -> AccountError {
    let detail = serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|p| p.detail)
        .map(|d| match d {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    AccountError::Rejected { status, detail }
}
