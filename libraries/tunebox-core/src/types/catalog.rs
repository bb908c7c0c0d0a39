//! Catalog domain type

use crate::error::{CoreError, Result};
use crate::types::{Track, TrackId};
use std::collections::HashSet;
use std::sync::Arc;

/// Ordered, immutable track list
///
/// Order is significant (newest first once uploads arrive) and ids are
/// unique. Cloning is cheap: every clone shares the same track storage, so
/// the playback session and the search view can hold the same catalog
/// without copying it. Growth never mutates in place; `with_prepended`
/// returns a new value and leaves readers of the old one untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tracks: Arc<[Track]>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if !seen.insert(&track.id) {
                return Err(CoreError::DuplicateTrack(track.id.clone()));
            }
        }

        Ok(Self {
            tracks: tracks.into(),
        })
    }

    /// Build a catalog, keeping the first occurrence of each id
    pub fn dedup(tracks: Vec<Track>) -> Self {
        let mut seen = HashSet::with_capacity(tracks.len());
        let total = tracks.len();
        let kept: Vec<Track> = tracks
            .into_iter()
            .filter(|track| seen.insert(track.id.clone()))
            .collect();

        if kept.len() != total {
            tracing::warn!(
                dropped = total - kept.len(),
                "Dropped duplicate track ids from catalog"
            );
        }

        Self {
            tracks: kept.into(),
        }
    }

    /// Empty catalog
    pub fn empty() -> Self {
        Self {
            tracks: Arc::from(Vec::new()),
        }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the catalog has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at a catalog position
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// All tracks in catalog order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Iterate tracks in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }

    /// Catalog position of a track id
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|track| &track.id == id)
    }

    /// Whether the catalog contains a track id
    pub fn contains(&self, id: &TrackId) -> bool {
        self.position_of(id).is_some()
    }

    /// New catalog with `track` at the front
    ///
    /// # Errors
    /// `CoreError::DuplicateTrack` if the id is already present.
    pub fn with_prepended(&self, track: Track) -> Result<Self> {
        if self.contains(&track.id) {
            return Err(CoreError::DuplicateTrack(track.id));
        }

        let mut tracks = Vec::with_capacity(self.len() + 1);
        tracks.push(track);
        tracks.extend(self.tracks.iter().cloned());

        Ok(Self {
            tracks: tracks.into(),
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> Track {
        Track::new(TrackId::new(id), format!("Song {id}"), "Artist", format!("/uploads/{id}.mp3"))
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Catalog::new(vec![track("a"), track("b"), track("a")]);
        match result {
            Err(CoreError::DuplicateTrack(id)) => assert_eq!(id.as_str(), "a"),
            other => panic!("Expected DuplicateTrack, got {other:?}"),
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut second_a = track("a");
        second_a.title = "Later".to_string();

        let catalog = Catalog::dedup(vec![track("a"), track("b"), second_a]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().title, "Song a");
    }

    #[test]
    fn prepend_leaves_original_untouched() {
        let original = Catalog::new(vec![track("a"), track("b")]).unwrap();
        let grown = original.with_prepended(track("c")).unwrap();

        assert_eq!(original.len(), 2);
        assert_eq!(grown.len(), 3);
        assert_eq!(grown.get(0).unwrap().id.as_str(), "c");
        assert_eq!(grown.position_of(&TrackId::new("a")), Some(1));
    }

    #[test]
    fn prepend_rejects_existing_id() {
        let catalog = Catalog::new(vec![track("a")]).unwrap();
        assert!(matches!(
            catalog.with_prepended(track("a")),
            Err(CoreError::DuplicateTrack(_))
        ));
    }

    #[test]
    fn empty_catalog() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.get(0), None);
        assert_eq!(catalog.position_of(&TrackId::new("x")), None);
    }
}
