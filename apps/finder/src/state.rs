use std::sync::Arc;

use reqwest::Client;

use crate::account::{AuthClient, AuthContext, ProfileClient};
use crate::config::Config;
use crate::directory::Directory;

/// Collaborators shared by the terminal session.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub http: Client,
    /// Token supplied or obtained at startup. The session may replace it.
    pub auth: Option<AuthContext>,
    pub directory: Arc<dyn Directory>,
}

impl AppState {
    pub fn auth_client(&self) -> AuthClient {
        AuthClient::new(self.http.clone(), &self.config.directory_url)
    }

    pub fn profile_client(&self, auth: &AuthContext) -> ProfileClient {
        ProfileClient::new(self.http.clone(), &self.config.directory_url, auth.clone())
    }
}
