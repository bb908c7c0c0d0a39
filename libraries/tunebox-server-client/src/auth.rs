//! Authentication methods for the Tunebox server.

use crate::client::error_message;
use crate::error::{Result, ServerClientError};
use crate::types::{Credentials, LoginResponse, RegisterResponse, UserInfo};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

/// Authentication client for the Tunebox server.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Login with username and password.
    ///
    /// Returns the bearer token and account on success.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let url = format!("{}/api/login", self.base_url);
        debug!(url = %url, username = %username, "Attempting login");

        let response = self
            .http
            .post(&url)
            .json(&credentials(username, password))
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let login_response: LoginResponse = response.json().await.map_err(|e| {
                ServerClientError::ParseError(format!("Failed to parse login response: {e}"))
            })?;

            info!(
                username = %login_response.user.username,
                user_id = %login_response.user.id,
                "Login successful"
            );

            Ok(login_response)
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let message = error_message(response).await;
            warn!(status = %status, error = %message, "Login failed");
            Err(ServerClientError::AuthFailed(message))
        } else {
            Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }

    /// Create an account.
    pub async fn register(&self, username: &str, password: &str) -> Result<RegisterResponse> {
        let url = format!("{}/api/register", self.base_url);
        debug!(url = %url, username = %username, "Registering account");

        let response = self
            .http
            .post(&url)
            .json(&credentials(username, password))
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let registered: RegisterResponse = response.json().await.map_err(|e| {
                ServerClientError::ParseError(format!("Failed to parse register response: {e}"))
            })?;
            info!(username = %username, user_id = %registered.user_id, "Account registered");
            Ok(registered)
        } else if status == StatusCode::BAD_REQUEST {
            Err(ServerClientError::AuthFailed(error_message(response).await))
        } else {
            Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }

    /// Get current user info using a bearer token.
    pub async fn current_user(&self, token: &str) -> Result<UserInfo> {
        let url = format!("{}/api/me", self.base_url);
        debug!(url = %url, "Getting current user info");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                ServerClientError::ParseError(format!("Failed to parse user info: {e}"))
            })
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ServerClientError::AuthRequired)
        } else {
            Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }

    /// Check whether a token is still accepted.
    pub async fn validate_token(&self, token: &str) -> Result<bool> {
        match self.current_user(token).await {
            Ok(_) => Ok(true),
            Err(ServerClientError::AuthRequired) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}
