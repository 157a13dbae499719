mod account;
mod config;
mod directory;
mod errors;
mod models;
mod search;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::account::{AuthClient, AuthContext};
use crate::config::Config;
use crate::directory::{build_http_client, HttpDirectoryClient};
use crate::errors::AppError;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the rendered page.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting TRACE finder v{}", env!("CARGO_PKG_VERSION"));
    info!("Directory: {}", config.directory_url);

    let http = build_http_client(config.request_timeout)?;
    let auth = resolve_auth(&config, &http).await;

    let directory = Arc::new(HttpDirectoryClient::new(
        http.clone(),
        &config.directory_url,
        auth.clone(),
    ));

    let state = AppState {
        config,
        http,
        auth,
        directory,
    };

    let mut stdout = tokio::io::stdout();
    session::run(&state, BufReader::new(tokio::io::stdin()), &mut stdout).await
}

/// Uses the configured token if there is one, otherwise logs in with the
/// configured credentials. Searching works anonymously, so a failed login
/// is reported and the session continues without a token.
async fn resolve_auth(config: &Config, http: &Client) -> Option<AuthContext> {
    if let Some(token) = &config.token {
        info!("Using bearer token from TRACE_TOKEN");
        return Some(AuthContext::bearer(token.clone()));
    }
    let credentials = config.credentials()?;
    let client = AuthClient::new(http.clone(), &config.directory_url);
    match client.login(&credentials).await {
        Ok(ctx) => Some(ctx),
        Err(e) => {
            AppError::from(e).report("Login failed, continuing anonymously");
            None
        }
    }
}
