//! Main Tunebox server client.

use crate::auth::AuthClient;
use crate::community::CommunityClient;
use crate::error::{Result, ServerClientError};
use crate::library::LibraryClient;
use crate::types::{ChatMessage, ErrorBody, LoginResponse, RegisterResponse, ServerConfig, UploadMetadata, UserInfo};
use crate::upload::UploadClient;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tunebox_core::{CatalogSource, CoreError, Track};

#[derive(Debug, Default)]
struct ClientState {
    config: ServerConfig,
    /// Username from the last login, used as the default upload artist
    username: Option<String>,
}

/// Main client for interacting with a Tunebox server.
///
/// The client holds the bearer token after `login` and hands out
/// catalog and upload operations.
///
/// # Example
///
/// ```ignore
/// use tunebox_server_client::{ServerConfig, TuneboxClient};
///
/// let client = TuneboxClient::new(ServerConfig::new("http://localhost:3000"))?;
///
/// let tracks = client.fetch_catalog().await?;
/// println!("Found {} tracks", tracks.len());
///
/// client.login("user", "password").await?;
/// let track = client.upload_track("song.mp3".as_ref(), None).await?;
/// println!("Uploaded {}", track.title);
/// ```
#[derive(Clone)]
pub struct TuneboxClient {
    http: Client,
    state: Arc<RwLock<ClientState>>,
}

impl TuneboxClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ServerConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ServerClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServerClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Tunebox/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            state: Arc::new(RwLock::new(ClientState {
                config: ServerConfig {
                    url,
                    token: config.token,
                },
                username: None,
            })),
        })
    }

    /// Get the normalized server URL.
    pub async fn url(&self) -> String {
        self.state.read().await.config.url.clone()
    }

    /// Check if the client holds a token.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.config.token.is_some()
    }

    /// Current bearer token.
    pub async fn token(&self) -> Option<String> {
        self.state.read().await.config.token.clone()
    }

    /// Set the token directly (e.g., from stored credentials).
    pub async fn set_token(&self, token: impl Into<String>) {
        self.state.write().await.config.token = Some(token.into());
    }

    /// Login with username and password.
    ///
    /// On success, the token is stored for subsequent requests.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let url = self.url().await;
        let response = AuthClient::new(&self.http, &url)
            .login(username, password)
            .await?;

        let mut state = self.state.write().await;
        state.config.token = Some(response.token.clone());
        state.username = Some(response.user.username.clone());

        Ok(response)
    }

    /// Create an account; does not log in.
    pub async fn register(&self, username: &str, password: &str) -> Result<RegisterResponse> {
        let url = self.url().await;
        AuthClient::new(&self.http, &url)
            .register(username, password)
            .await
    }

    /// Clear the stored token (logout).
    pub async fn logout(&self) {
        let mut state = self.state.write().await;
        state.config.token = None;
        state.username = None;
        info!("Logged out");
    }

    /// Account behind the stored token.
    ///
    /// A rejected token is cleared and reported as `AuthRequired`.
    pub async fn current_user(&self) -> Result<UserInfo> {
        let (url, token) = self.credentials().await?;

        match AuthClient::new(&self.http, &url).current_user(&token).await {
            Ok(user) => {
                self.state.write().await.username = Some(user.username.clone());
                Ok(user)
            }
            Err(ServerClientError::AuthRequired) => {
                warn!("Stored token rejected, clearing it");
                self.logout().await;
                Err(ServerClientError::AuthRequired)
            }
            Err(e) => Err(e),
        }
    }

    /// Check whether the stored token is still accepted.
    pub async fn validate_token(&self) -> Result<bool> {
        let state = self.state.read().await;
        let Some(token) = state.config.token.clone() else {
            return Ok(false);
        };
        let url = state.config.url.clone();
        drop(state);

        AuthClient::new(&self.http, &url).validate_token(&token).await
    }

    /// Every registered account; needs a token.
    pub async fn list_users(&self) -> Result<Vec<UserInfo>> {
        let (url, token) = self.credentials().await?;
        CommunityClient::new(&self.http, &url, &token).list_users().await
    }

    /// Stored chat messages, oldest first; needs a token.
    pub async fn message_history(&self) -> Result<Vec<ChatMessage>> {
        let (url, token) = self.credentials().await?;
        CommunityClient::new(&self.http, &url, &token)
            .message_history()
            .await
    }

    /// Fetch the catalog, newest first, with absolute audio URLs.
    pub async fn fetch_catalog(&self) -> Result<Vec<Track>> {
        let url = self.url().await;
        LibraryClient::new(&self.http, &url).get_catalog().await
    }

    /// Get an upload handle.
    ///
    /// Returns an error if not authenticated.
    pub async fn upload(&self) -> Result<UploadClientHandle> {
        let state = self.state.read().await;
        let token = state
            .config
            .token
            .clone()
            .ok_or(ServerClientError::AuthRequired)?;

        Ok(UploadClientHandle {
            http: self.http.clone(),
            url: state.config.url.clone(),
            token,
            uploader: state.username.clone(),
        })
    }

    /// Upload one file and return the created track.
    pub async fn upload_track(
        &self,
        file_path: &Path,
        metadata: Option<&UploadMetadata>,
    ) -> Result<Track> {
        let handle = self.upload().await?;
        handle.client().upload_track(file_path, metadata).await
    }

    async fn credentials(&self) -> Result<(String, String)> {
        let state = self.state.read().await;
        let token = state
            .config
            .token
            .clone()
            .ok_or(ServerClientError::AuthRequired)?;
        Ok((state.config.url.clone(), token))
    }
}

#[async_trait]
impl CatalogSource for TuneboxClient {
    async fn fetch_catalog(&self) -> tunebox_core::Result<Vec<Track>> {
        TuneboxClient::fetch_catalog(self).await.map_err(CoreError::from)
    }
}

/// Handle for upload operations.
///
/// This is returned by `TuneboxClient::upload()` and owns a snapshot of
/// the credentials.
pub struct UploadClientHandle {
    http: Client,
    url: String,
    token: String,
    uploader: Option<String>,
}

impl UploadClientHandle {
    /// Get the upload client.
    pub fn client(&self) -> UploadClient<'_> {
        UploadClient::new(&self.http, &self.url, &self.token, self.uploader.as_deref())
    }
}

/// Best-effort error text: the `error` field of a JSON body, else the raw body.
pub(crate) async fn error_message(response: Response) -> String {
    let text = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        assert!(TuneboxClient::new(ServerConfig::new("https://example.com")).is_ok());
        assert!(TuneboxClient::new(ServerConfig::new("http://localhost:3000")).is_ok());

        assert!(TuneboxClient::new(ServerConfig::new("")).is_err());
        assert!(TuneboxClient::new(ServerConfig::new("not-a-url")).is_err());
        assert!(TuneboxClient::new(ServerConfig::new("ftp://example.com")).is_err());
    }

    #[tokio::test]
    async fn test_url_normalization() {
        let client = TuneboxClient::new(ServerConfig::new("http://localhost:3000//")).unwrap();
        assert_eq!(client.url().await, "http://localhost:3000");
    }

    #[tokio::test]
    async fn upload_requires_token() {
        let client = TuneboxClient::new(ServerConfig::new("http://localhost:3000")).unwrap();
        assert!(matches!(
            client.upload().await,
            Err(ServerClientError::AuthRequired)
        ));
    }
}
