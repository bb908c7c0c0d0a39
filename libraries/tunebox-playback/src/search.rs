//! Search view over the catalog
//!
//! The view is a derived value: recompute it whenever the query or the
//! catalog changes instead of patching it. Entries keep their catalog
//! position so a selection made in the filtered list addresses the same
//! track the unfiltered list would.

use tunebox_core::{Catalog, Track};

/// One visible entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchEntry<'a> {
    /// The matching track
    pub track: &'a Track,

    /// Position of the track in the catalog the view was derived from
    pub original_index: usize,
}

/// Order-preserving filtered projection of a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView<'a> {
    entries: Vec<SearchEntry<'a>>,
}

impl<'a> SearchView<'a> {
    /// Visible entries in catalog order
    pub fn entries(&self) -> &[SearchEntry<'a>] {
        &self.entries
    }

    /// Number of visible entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a view position
    pub fn get(&self, view_position: usize) -> Option<&SearchEntry<'a>> {
        self.entries.get(view_position)
    }

    /// Catalog index for a view position
    pub fn resolve(&self, view_position: usize) -> Option<usize> {
        self.entries.get(view_position).map(|entry| entry.original_index)
    }

    /// View position of a catalog index, if it is visible
    pub fn position_of(&self, catalog_index: usize) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.original_index == catalog_index)
    }

    /// Iterate visible entries
    pub fn iter(&self) -> std::slice::Iter<'_, SearchEntry<'a>> {
        self.entries.iter()
    }
}

/// Filter a catalog by a free-text query
///
/// An empty (or whitespace-only) query yields the whole catalog. Otherwise a
/// track is kept when the query is a case-insensitive substring of its title
/// or its artist.
pub fn filter<'a>(catalog: &'a Catalog, query: &str) -> SearchView<'a> {
    let needle = query.trim().to_lowercase();

    let entries = catalog
        .iter()
        .enumerate()
        .filter(|(_, track)| needle.is_empty() || matches(track, &needle))
        .map(|(original_index, track)| SearchEntry {
            track,
            original_index,
        })
        .collect();

    SearchView { entries }
}

fn matches(track: &Track, needle: &str) -> bool {
    track.title.to_lowercase().contains(needle) || track.artist.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunebox_core::TrackId;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Track::new(TrackId::new("1"), "Blue Monday", "New Order", "/1.mp3"),
            Track::new(TrackId::new("2"), "Bizarre Love Triangle", "New Order", "/2.mp3"),
            Track::new(TrackId::new("3"), "Blue in Green", "Miles Davis", "/3.mp3"),
            Track::new(TrackId::new("4"), "So What", "Miles Davis", "/4.mp3"),
        ])
        .unwrap()
    }

    #[test]
    fn empty_query_is_identity() {
        let catalog = catalog();
        let view = filter(&catalog, "");

        assert_eq!(view.len(), catalog.len());
        for (position, entry) in view.iter().enumerate() {
            assert_eq!(entry.original_index, position);
            assert_eq!(entry.track, catalog.get(position).unwrap());
        }
    }

    #[test]
    fn whitespace_query_is_identity() {
        let catalog = catalog();
        assert_eq!(filter(&catalog, "   ").len(), 4);
    }

    #[test]
    fn matches_title_case_insensitively() {
        let catalog = catalog();
        let view = filter(&catalog, "BLUE");

        let indices: Vec<usize> = view.iter().map(|e| e.original_index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn matches_artist() {
        let catalog = catalog();
        let view = filter(&catalog, "miles");

        let indices: Vec<usize> = view.iter().map(|e| e.original_index).collect();
        assert_eq!(indices, vec![2, 3]);
    }

    #[test]
    fn no_match_is_empty() {
        let catalog = catalog();
        let view = filter(&catalog, "zeppelin");
        assert!(view.is_empty());
        assert_eq!(view.resolve(0), None);
    }

    #[test]
    fn resolve_and_position_of_are_inverse() {
        let catalog = catalog();
        let view = filter(&catalog, "what");

        assert_eq!(view.resolve(0), Some(3));
        assert_eq!(view.position_of(3), Some(0));
        assert_eq!(view.position_of(0), None);
    }
}
