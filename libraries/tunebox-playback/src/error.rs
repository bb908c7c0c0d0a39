//! Error types for playback management

use thiserror::Error;
use tunebox_core::CoreError;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Catalog index outside `[0, len)`
    #[error("Invalid index {index} for catalog of {len} tracks")]
    InvalidIndex {
        /// Requested catalog position
        index: usize,
        /// Catalog length at the time of the call
        len: usize,
    },

    /// Operation needs a selected track
    #[error("No track selected")]
    NoTrackSelected,

    /// Catalog could not be loaded
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
