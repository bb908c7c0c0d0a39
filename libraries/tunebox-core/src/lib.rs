//! Tunebox Core
//!
//! Platform-agnostic core types, traits, and error handling for Tunebox.
//!
//! This crate provides the building blocks shared by the playback session,
//! the catalog server client, and the applications.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `Catalog`
//! - **Core Traits**: `CatalogSource`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tunebox_core::{Catalog, Track, TrackId};
//!
//! let first = Track::new(TrackId::new("1"), "Intro", "Band", "/uploads/1.mp3");
//! let catalog = Catalog::new(vec![first]).unwrap();
//!
//! // Uploads produce a new catalog value, newest first
//! let upload = Track::new(TrackId::new("2"), "Encore", "Band", "/uploads/2.mp3");
//! let grown = catalog.with_prepended(upload).unwrap();
//!
//! assert_eq!(catalog.len(), 1);
//! assert_eq!(grown.get(0).unwrap().title, "Encore");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::CatalogSource;
pub use types::{Catalog, Track, TrackId, DEFAULT_COVER_URL};
