/// Directory client: the single point of entry for candidate search calls.
///
/// The search pipeline only sees the `Directory` trait, so tests and
/// alternative backends plug in without touching the pipeline.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::account::AuthContext;
use crate::models::Candidate;

const SEARCH_PATH: &str = "/api/search";

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Directory returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// A remote candidate directory. One call per effective query.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, DirectoryError>;
}

/// Builds the shared HTTP client used by the directory and account clients.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// `GET /api/search` over HTTP. Attaches the bearer token when one was supplied.
#[derive(Clone)]
pub struct HttpDirectoryClient {
    client: Client,
    base_url: String,
    auth: Option<AuthContext>,
}

impl HttpDirectoryClient {
    pub fn new(client: Client, base_url: &str, auth: Option<AuthContext>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }
}

#[async_trait]
impl Directory for HttpDirectoryClient {
    async fn search(&self, query: &str) -> Result<Vec<Candidate>, DirectoryError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let mut request = self.client.get(url).query(&[("query", query)]);
        if let Some(auth) = &self.auth {
            request = auth.authorize(request);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DirectoryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)?;
        debug!(
            "Directory returned {} candidates for {:?}",
            parsed.candidates.len(),
            query
        );
        Ok(parsed.candidates)
    }
}
