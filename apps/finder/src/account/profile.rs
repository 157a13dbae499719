use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{rejection, AccountError, AuthContext};
use crate::models::user::{Certificate, Profile, ProfileUpdate, User};

/// Bearer-authenticated profile operations.
#[derive(Clone)]
pub struct ProfileClient {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl ProfileClient {
    pub fn new(client: Client, base_url: &str, auth: AuthContext) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        }
    }

    /// GET /api/me
    pub async fn me(&self) -> Result<User, AccountError> {
        let request = self.client.get(self.url("/api/me"));
        decode(self.auth.authorize(request).send().await?, "Failed to fetch user").await
    }

    /// PUT /api/profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, AccountError> {
        let request = self.client.put(self.url("/api/profile")).json(update);
        decode(
            self.auth.authorize(request).send().await?,
            "Failed to update profile",
        )
        .await
    }

    /// POST /api/upload (multipart `file` + `description`)
    pub async fn upload_certificate(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        description: &str,
    ) -> Result<Certificate, AccountError> {
        debug!("Uploading certificate {filename} ({} bytes)", bytes.len());
        let form = multipart::Form::new()
            .part(
                "file",
                multipart::Part::bytes(bytes).file_name(filename.to_string()),
            )
            .text("description", description.to_string());
        let request = self.client.post(self.url("/api/upload")).multipart(form);
        decode(self.auth.authorize(request).send().await?, "Upload failed").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn decode<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, AccountError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(rejection(status.as_u16(), &body, fallback));
    }
    Ok(serde_json::from_str(&body)?)
}
