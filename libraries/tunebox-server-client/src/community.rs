//! Account directory and chat history.
//!
//! Read-only views of the other people on the server. Live chat delivery
//! happens over a socket and is not handled here.

use crate::client::error_message;
use crate::error::{Result, ServerClientError};
use crate::types::{ChatMessage, UserInfo};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for `/api/users` and `/api/messages`.
pub struct CommunityClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    token: &'a str,
}

impl<'a> CommunityClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, token: &'a str) -> Self {
        Self {
            http,
            base_url,
            token,
        }
    }

    /// Every registered account.
    pub async fn list_users(&self) -> Result<Vec<UserInfo>> {
        let users: Vec<UserInfo> = self.get("/api/users", "user list").await?;
        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    /// Chat messages, oldest first.
    pub async fn message_history(&self) -> Result<Vec<ChatMessage>> {
        let messages: Vec<ChatMessage> = self.get("/api/messages", "message history").await?;
        debug!(count = messages.len(), "Fetched message history");
        Ok(messages)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "Fetching {what}");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.token)
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ServerClientError::ParseError(format!("Failed to parse {what}: {e}")))
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ServerClientError::AuthRequired)
        } else {
            Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }
}
