//! Track domain type

use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Cover art used when the server does not provide one
pub const DEFAULT_COVER_URL: &str =
    "https://images.unsplash.com/photo-1459749411177-d4a37196040e?auto=format&fit=crop&q=80&w=400&h=400";

/// Audio track as listed in the catalog
///
/// Immutable once created. A re-fetch replaces tracks wholesale instead of
/// patching them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Cover art location
    pub cover_url: String,

    /// Audio source location handed to the media engine
    pub audio_url: String,
}

impl Track {
    /// Create a track with the default cover art
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            cover_url: DEFAULT_COVER_URL.to_string(),
            audio_url: audio_url.into(),
        }
    }

    /// Replace the cover art location
    #[must_use]
    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = cover_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_track_uses_default_cover() {
        let track = Track::new(TrackId::new("1"), "Song", "Artist", "/uploads/song.mp3");
        assert_eq!(track.cover_url, DEFAULT_COVER_URL);
        assert_eq!(track.audio_url, "/uploads/song.mp3");
    }

    #[test]
    fn with_cover_overrides() {
        let track = Track::new(TrackId::new("1"), "Song", "Artist", "/a.mp3").with_cover("/c.jpg");
        assert_eq!(track.cover_url, "/c.jpg");
    }
}
