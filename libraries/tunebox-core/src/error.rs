//! Core error types for Tunebox

use crate::types::TrackId;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Tunebox
#[derive(Error, Debug)]
pub enum CoreError {
    /// Catalog could not be fetched or parsed
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Two tracks in one catalog share an id
    #[error("Duplicate track in catalog: {0}")]
    DuplicateTrack(TrackId),
}

impl CoreError {
    /// Create a catalog-unavailable error
    pub fn catalog_unavailable(msg: impl Into<String>) -> Self {
        Self::CatalogUnavailable(msg.into())
    }
}
