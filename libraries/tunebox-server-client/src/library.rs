//! Catalog operations for the Tunebox server.

use crate::client::error_message;
use crate::error::{Result, ServerClientError};
use crate::types::ServerSong;
use reqwest::Client;
use tracing::debug;
use tunebox_core::Track;
use url::Url;

/// Catalog client for the Tunebox server.
///
/// The song list is public; no token is sent.
pub struct LibraryClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> LibraryClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Raw song records, newest first.
    pub async fn get_songs(&self) -> Result<Vec<ServerSong>> {
        let url = format!("{}/api/songs", self.base_url);
        debug!(url = %url, "Fetching songs");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let songs: Vec<ServerSong> = response.json().await.map_err(|e| {
                ServerClientError::ParseError(format!("Failed to parse song list: {e}"))
            })?;
            debug!(songs = songs.len(), "Fetched songs");
            Ok(songs)
        } else {
            Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }

    /// Catalog tracks with playable absolute audio URLs.
    pub async fn get_catalog(&self) -> Result<Vec<Track>> {
        let songs = self.get_songs().await?;
        songs
            .into_iter()
            .map(|song| {
                let audio_url = resolve_media_url(self.base_url, &song.url)?;
                Ok(song.into_track(audio_url))
            })
            .collect()
    }
}

/// Resolve a server-relative media path (`/uploads/x.mp3`) against the base URL.
///
/// Absolute URLs pass through unchanged.
pub fn resolve_media_url(base_url: &str, media_url: &str) -> Result<String> {
    if media_url.starts_with("http://") || media_url.starts_with("https://") {
        return Ok(media_url.to_string());
    }

    let base = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
        .map_err(|e| ServerClientError::InvalidUrl(e.to_string()))?;
    let resolved = base
        .join(media_url)
        .map_err(|e| ServerClientError::ParseError(format!("Bad media URL {media_url:?}: {e}")))?;

    Ok(resolved.to_string())
}
