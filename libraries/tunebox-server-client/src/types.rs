//! Types for Tunebox server API requests and responses.

use serde::{Deserialize, Serialize};
use tunebox_core::{Track, TrackId, DEFAULT_COVER_URL};

/// Configuration for connecting to a Tunebox server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "http://localhost:3000")
    pub url: String,
    /// Bearer token (if authenticated)
    #[serde(default)]
    pub token: Option<String>,
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
        }
    }

    /// Create a config with an existing token.
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: Some(token.into()),
        }
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for the login and register endpoints.
#[derive(Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response from successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Response from successful registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: RawId,
}

/// Account as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub id: RawId,
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Chat message from `GET /api/messages`, joined with its sender.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMessage {
    pub id: RawId,
    #[serde(default)]
    pub sender_id: Option<RawId>,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Sender's username; absent when the account was deleted
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Error body returned by the server (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// Database id; numeric or string depending on the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Str(String),
}

impl From<RawId> for TrackId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => TrackId::from(n),
            RawId::Str(s) => TrackId::new(s),
        }
    }
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawId::Int(n) => write!(f, "{n}"),
            RawId::Str(s) => f.write_str(s),
        }
    }
}

/// A song as returned by `GET /api/songs` and `POST /api/songs`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSong {
    pub id: RawId,
    pub title: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    /// Absolute URL or server-relative path (`/uploads/<file>`)
    pub url: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ServerSong {
    /// Convert to a catalog track, using an already-resolved audio URL.
    pub fn into_track(self, audio_url: String) -> Track {
        let cover = self
            .cover
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_COVER_URL.to_string());

        Track::new(
            self.id.into(),
            self.title,
            self.artist.unwrap_or_else(|| "Unknown Artist".to_string()),
            audio_url,
        )
        .with_cover(cover)
    }
}

// =============================================================================
// Upload Types
// =============================================================================

/// Metadata sent alongside an upload.
///
/// Missing fields are defaulted the same way the server does: the title
/// falls back to the file stem, the artist to the logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
}

impl UploadMetadata {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            artist: Some(artist.into()),
        }
    }
}

/// Progress of a batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    /// Index of the file being uploaded
    pub track_index: usize,
    /// Files in the batch
    pub total_tracks: usize,
    /// File name of the current upload
    pub current_file: String,
    /// Bytes sent so far for the current file
    pub bytes_sent: u64,
    /// Size of the current file
    pub bytes_total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_ids_accept_numbers_and_strings() {
        let numeric: ServerSong =
            serde_json::from_str(r#"{"id": 7, "title": "T", "artist": "A", "url": "/uploads/x.mp3"}"#)
                .unwrap();
        let text: ServerSong = serde_json::from_str(
            r#"{"id": "9f1c", "title": "T", "artist": "A", "url": "/uploads/x.mp3"}"#,
        )
        .unwrap();

        assert_eq!(TrackId::from(numeric.id), TrackId::new("7"));
        assert_eq!(TrackId::from(text.id), TrackId::new("9f1c"));
    }

    #[test]
    fn missing_artist_and_cover_get_defaults() {
        let song: ServerSong =
            serde_json::from_str(r#"{"id": 1, "title": "Demo", "cover": "", "url": "/uploads/d.mp3"}"#)
                .unwrap();
        let track = song.into_track("http://host/uploads/d.mp3".into());

        assert_eq!(track.artist, "Unknown Artist");
        assert_eq!(track.cover_url, DEFAULT_COVER_URL);
        assert_eq!(track.audio_url, "http://host/uploads/d.mp3");
    }

    #[test]
    fn register_response_uses_camel_case() {
        let body: RegisterResponse =
            serde_json::from_str(r#"{"message": "User registered successfully", "userId": 12}"#)
                .unwrap();
        assert_eq!(body.user_id, RawId::Int(12));
    }
}
