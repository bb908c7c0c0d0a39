//! Catalog integration tests
//!
//! Exercise the public catalog API the way the playback crate and the
//! server client use it.

use proptest::prelude::*;
use tunebox_core::{Catalog, CatalogSource, CoreError, Track, TrackId};

fn track(id: &str) -> Track {
    Track::new(
        TrackId::new(id),
        format!("Title {id}"),
        format!("Artist {id}"),
        format!("/uploads/{id}.mp3"),
    )
}

#[tokio::test]
async fn vec_catalog_source_returns_tracks_in_order() {
    let source = vec![track("3"), track("2"), track("1")];
    let fetched = source.fetch_catalog().await.unwrap();

    let ids: Vec<&str> = fetched.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "2", "1"]);
}

#[test]
fn clones_share_contents() {
    let catalog = Catalog::new(vec![track("a"), track("b")]).unwrap();
    let handle = catalog.clone();

    assert_eq!(catalog, handle);
    assert_eq!(handle.tracks().len(), 2);
}

#[test]
fn successive_uploads_are_newest_first() {
    let mut catalog = Catalog::new(vec![track("1")]).unwrap();
    for id in ["2", "3", "4"] {
        catalog = catalog.with_prepended(track(id)).unwrap();
    }

    let ids: Vec<&str> = catalog.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["4", "3", "2", "1"]);
}

#[test]
fn duplicate_error_names_the_track() {
    let err = Catalog::new(vec![track("x"), track("x")]).unwrap_err();
    assert_eq!(err.to_string(), "Duplicate track in catalog: x");
    assert!(matches!(err, CoreError::DuplicateTrack(_)));
}

proptest! {
    /// Property: prepending shifts every existing track by exactly one
    #[test]
    fn prepend_shifts_positions_by_one(count in 0usize..40) {
        let tracks: Vec<Track> = (0..count).map(|n| track(&n.to_string())).collect();
        let catalog = Catalog::new(tracks).unwrap();
        let grown = catalog.with_prepended(track("new")).unwrap();

        prop_assert_eq!(grown.len(), catalog.len() + 1);
        for (index, existing) in catalog.iter().enumerate() {
            prop_assert_eq!(grown.position_of(&existing.id), Some(index + 1));
        }
    }

    /// Property: dedup never yields a catalog that `new` would reject
    #[test]
    fn dedup_output_is_valid(ids in prop::collection::vec(0u8..10, 0..30)) {
        let tracks: Vec<Track> = ids.iter().map(|n| track(&n.to_string())).collect();
        let deduped = Catalog::dedup(tracks);

        prop_assert!(Catalog::new(deduped.tracks().to_vec()).is_ok());
    }
}
