//! Playback history tracking
//!
//! Bounded record of played tracks, used by `previous` while shuffle is on.
//! Entries are track ids rather than positions so they survive the catalog
//! growing underneath the session.

use std::collections::VecDeque;
use tunebox_core::TrackId;

/// Playback history with bounded size
///
/// Ring buffer that discards the oldest entry once full.
#[derive(Debug, Clone)]
pub struct History {
    /// History buffer (most recent = back)
    tracks: VecDeque<TrackId>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Add track to history
    ///
    /// If history is full, oldest track is discarded. Pushing the track that
    /// is already most recent is a no-op, so repeat-one loops do not flood
    /// the buffer.
    pub fn push(&mut self, id: TrackId) {
        if self.max_size == 0 || self.tracks.back() == Some(&id) {
            return;
        }
        if self.tracks.len() >= self.max_size {
            self.tracks.pop_front();
        }
        self.tracks.push_back(id);
    }

    /// Pop most recent track from history
    pub fn pop(&mut self) -> Option<TrackId> {
        self.tracks.pop_back()
    }

    /// Number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Drop entries whose track no longer exists
    pub fn retain(&mut self, mut keep: impl FnMut(&TrackId) -> bool) {
        self.tracks.retain(|id| keep(id));
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop_is_lifo() {
        let mut history = History::new(10);
        history.push(TrackId::new("a"));
        history.push(TrackId::new("b"));

        assert_eq!(history.pop(), Some(TrackId::new("b")));
        assert_eq!(history.pop(), Some(TrackId::new("a")));
        assert_eq!(history.pop(), None);
    }

    #[test]
    fn discards_oldest_when_full() {
        let mut history = History::new(2);
        history.push(TrackId::new("a"));
        history.push(TrackId::new("b"));
        history.push(TrackId::new("c"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.pop(), Some(TrackId::new("c")));
        assert_eq!(history.pop(), Some(TrackId::new("b")));
        assert!(history.is_empty());
    }

    #[test]
    fn repeated_push_is_collapsed() {
        let mut history = History::new(5);
        history.push(TrackId::new("a"));
        history.push(TrackId::new("a"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = History::new(0);
        history.push(TrackId::new("a"));
        assert!(history.is_empty());
    }

    #[test]
    fn retain_drops_missing_tracks() {
        let mut history = History::new(5);
        history.push(TrackId::new("a"));
        history.push(TrackId::new("b"));
        history.retain(|id| id.as_str() != "a");

        assert_eq!(history.len(), 1);
        assert_eq!(history.pop(), Some(TrackId::new("b")));
    }
}
