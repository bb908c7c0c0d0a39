//! Track upload operations for the Tunebox server.

use crate::client::error_message;
use crate::error::{Result, ServerClientError};
use crate::library::resolve_media_url;
use crate::types::{ServerSong, UploadMetadata, UploadProgress};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tunebox_core::Track;

/// Largest file the server accepts (100 MB).
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Upload client for the Tunebox server.
pub struct UploadClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    token: &'a str,
    uploader: Option<&'a str>,
}

impl<'a> UploadClient<'a> {
    pub(crate) fn new(
        http: &'a Client,
        base_url: &'a str,
        token: &'a str,
        uploader: Option<&'a str>,
    ) -> Self {
        Self {
            http,
            base_url,
            token,
            uploader,
        }
    }

    /// Upload a single audio file.
    ///
    /// # Arguments
    /// * `file_path` - Path to the audio file
    /// * `metadata` - Title/artist; gaps are filled from the file stem and
    ///   the logged-in user
    ///
    /// # Returns
    /// The created catalog track, ready to prepend.
    pub async fn upload_track(
        &self,
        file_path: &Path,
        metadata: Option<&UploadMetadata>,
    ) -> Result<Track> {
        if !file_path.is_file() {
            return Err(ServerClientError::FileNotFound(
                file_path.display().to_string(),
            ));
        }

        let size = tokio::fs::metadata(file_path).await?.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(ServerClientError::FileTooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("track")
            .to_string();
        let (title, artist) = self.resolve_metadata(file_path, metadata);

        debug!(file = %file_path.display(), title = %title, artist = %artist, "Uploading track");

        let contents = tokio::fs::read(file_path).await?;
        let file_part = Part::bytes(contents)
            .file_name(file_name.clone())
            .mime_str(mime_type_for_file(file_path))?;

        let form = Form::new()
            .part("audio", file_part)
            .text("title", title)
            .text("artist", artist);

        let url = format!("{}/api/songs", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token)
            .multipart(form)
            .send()
            .await
            .map_err(ServerClientError::from_send)?;

        let status = response.status();

        if status.is_success() {
            let song: ServerSong = response.json().await.map_err(|e| {
                ServerClientError::ParseError(format!("Failed to parse upload response: {e}"))
            })?;
            let audio_url = resolve_media_url(self.base_url, &song.url)?;
            let track = song.into_track(audio_url);

            info!(track_id = %track.id, file = %file_name, size, "Track uploaded");
            Ok(track)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ServerClientError::AuthRequired)
        } else if status == StatusCode::PAYLOAD_TOO_LARGE {
            Err(ServerClientError::FileTooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            })
        } else {
            let message = error_message(response).await;
            if message.contains("File too large") {
                return Err(ServerClientError::FileTooLarge {
                    size,
                    limit: MAX_UPLOAD_BYTES,
                });
            }
            Err(ServerClientError::ServerError {
                status: status.as_u16(),
                message,
            })
        }
    }

    /// Upload several files in order with progress reporting.
    ///
    /// A failed file does not stop the batch.
    ///
    /// # Returns
    /// One result per input file, in input order.
    pub async fn upload_tracks_batch<F>(
        &self,
        files: Vec<(PathBuf, Option<UploadMetadata>)>,
        mut progress_callback: F,
    ) -> Vec<Result<Track>>
    where
        F: FnMut(UploadProgress),
    {
        let total_tracks = files.len();
        let mut results = Vec::with_capacity(total_tracks);

        for (index, (file_path, metadata)) in files.into_iter().enumerate() {
            let current_file = file_path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            let bytes_total = file_path.metadata().map(|m| m.len()).unwrap_or(0);

            progress_callback(UploadProgress {
                track_index: index,
                total_tracks,
                current_file: current_file.clone(),
                bytes_sent: 0,
                bytes_total,
            });

            let result = self.upload_track(&file_path, metadata.as_ref()).await;
            if let Err(err) = &result {
                warn!(file = %current_file, error = %err, "Upload failed");
            }

            progress_callback(UploadProgress {
                track_index: index,
                total_tracks,
                current_file,
                bytes_sent: if result.is_ok() { bytes_total } else { 0 },
                bytes_total,
            });

            results.push(result);
        }

        results
    }

    fn resolve_metadata(&self, path: &Path, metadata: Option<&UploadMetadata>) -> (String, String) {
        let title = metadata
            .and_then(|m| m.title.clone())
            .filter(|t| !t.trim().is_empty())
            .or_else(|| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .unwrap_or_else(|| "Untitled".to_string());

        let artist = metadata
            .and_then(|m| m.artist.clone())
            .filter(|a| !a.trim().is_empty())
            .or_else(|| self.uploader.map(str::to_string))
            .unwrap_or_else(|| "Unknown Artist".to_string());

        (title, artist)
    }
}

/// Get MIME type for an audio file.
fn mime_type_for_file(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("opus") => "audio/opus",
        Some("flac") => "audio/flac",
        Some("m4a" | "aac") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_type_for_file(Path::new("song.mp3")), "audio/mpeg");
        assert_eq!(mime_type_for_file(Path::new("SONG.WAV")), "audio/wav");
        assert_eq!(mime_type_for_file(Path::new("song.m4a")), "audio/mp4");
        assert_eq!(
            mime_type_for_file(Path::new("notes.txt")),
            "application/octet-stream"
        );
    }

    #[test]
    fn metadata_defaults_follow_server_rules() {
        let http = Client::new();
        let anonymous = UploadClient::new(&http, "http://localhost", "t", None);
        let named = UploadClient::new(&http, "http://localhost", "t", Some("dj"));
        let path = Path::new("/music/Night Drive.mp3");

        assert_eq!(
            anonymous.resolve_metadata(path, None),
            ("Night Drive".to_string(), "Unknown Artist".to_string())
        );
        assert_eq!(
            named.resolve_metadata(path, Some(&UploadMetadata::default())),
            ("Night Drive".to_string(), "dj".to_string())
        );
        assert_eq!(
            named.resolve_metadata(path, Some(&UploadMetadata::new("Custom", "Band"))),
            ("Custom".to_string(), "Band".to_string())
        );
    }
}
