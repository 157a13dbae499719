use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{rejection, AccountError, AuthContext};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Local checks run before the form is submitted.
    pub fn validate(&self) -> Result<Credentials, AccountError> {
        if self.password != self.confirm_password {
            return Err(AccountError::Validation(
                "Passwords do not match".to_string(),
            ));
        }
        Ok(Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges credentials for a bearer token.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST /auth/login
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthContext, AccountError> {
        let ctx = self
            .exchange("/auth/login", credentials, "Login failed")
            .await?;
        info!("Logged in as {}", credentials.email);
        Ok(ctx)
    }

    /// POST /auth/signup
    pub async fn signup(&self, form: &SignupForm) -> Result<AuthContext, AccountError> {
        let credentials = form.validate()?;
        let ctx = self
            .exchange("/auth/signup", &credentials, "Signup failed")
            .await?;
        info!("Registered {}", credentials.email);
        Ok(ctx)
    }

    async fn exchange(
        &self,
        path: &str,
        credentials: &Credentials,
        fallback: &str,
    ) -> Result<AuthContext, AccountError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body, fallback));
        }

        let token: TokenResponse = serde_json::from_str(&body)?;
        Ok(AuthContext::bearer(token.access_token))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::spawn_stub;

    async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if body["password"] == "securepassword123" {
            (
                StatusCode::OK,
                Json(json!({"access_token": "tok-abc", "token_type": "bearer"})),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Incorrect email or password"})),
            )
        }
    }

    fn credentials(password: &str) -> Credentials {
        Credentials {
            email: "testuser@example.com".into(),
            password: password.into(),
        }
    }

    async fn auth_client(router: Router) -> AuthClient {
        let base = spawn_stub(router).await;
        AuthClient::new(Client::new(), &base)
    }

    #[tokio::test]
    async fn test_login_returns_bearer() {
        let client = auth_client(Router::new().route("/auth/login", post(login))).await;
        let ctx = client
            .login(&credentials("securepassword123"))
            .await
            .unwrap();
        assert_eq!(ctx.token(), "tok-abc");
    }

    #[tokio::test]
    async fn test_login_surfaces_detail_verbatim() {
        let client = auth_client(Router::new().route("/auth/login", post(login))).await;
        let err = client.login(&credentials("wrong")).await.unwrap_err();
        assert_eq!(err.to_string(), "Incorrect email or password");
    }

    #[tokio::test]
    async fn test_signup_mismatch_never_reaches_service() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = Router::new()
            .route(
                "/auth/signup",
                post(|State(hits): State<Arc<AtomicUsize>>| async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"access_token": "tok"}))
                }),
            )
            .with_state(hits.clone());
        let client = auth_client(router).await;

        let form = SignupForm {
            email: "a@b.co".into(),
            password: "one".into(),
            confirm_password: "two".into(),
        };
        let err = client.signup(&form).await.unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
        assert_eq!(err.to_string(), "Passwords do not match");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_signup_rejection_falls_back_to_default_message() {
        let router = Router::new().route(
            "/auth/signup",
            post(|| async { (StatusCode::BAD_REQUEST, "bad") }),
        );
        let client = auth_client(router).await;
        let form = SignupForm {
            email: "a@b.co".into(),
            password: "pw".into(),
            confirm_password: "pw".into(),
        };
        let err = client.signup(&form).await.unwrap_err();
        assert_eq!(err.to_string(), "Signup failed");
    }
}
