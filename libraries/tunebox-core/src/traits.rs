//! Core traits for Tunebox

use crate::error::Result;
use crate::types::Track;
use async_trait::async_trait;

/// Catalog source trait
///
/// Implementers fetch the ordered track list for a session. The playback
/// core calls this once per session and never retries on its own; any retry
/// policy belongs to the implementer.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full catalog, newest track first
    ///
    /// # Errors
    /// Returns `CoreError::CatalogUnavailable` on transport or parse failure
    async fn fetch_catalog(&self) -> Result<Vec<Track>>;
}

/// Fixed in-memory catalog, used by tests and offline sessions
#[async_trait]
impl CatalogSource for Vec<Track> {
    async fn fetch_catalog(&self) -> Result<Vec<Track>> {
        Ok(self.clone())
    }
}
