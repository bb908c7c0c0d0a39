//! Tunebox Server Client
//!
//! HTTP client library for the Tunebox catalog server.
//!
//! # Features
//!
//! - **Authentication**: Register, login with username/password, token validation
//! - **Catalog**: Fetch the song list with playable absolute URLs
//! - **Upload**: Upload audio files, singly or in batches with progress reporting
//! - **Community**: List accounts and read chat history
//!
//! `TuneboxClient` also implements `tunebox_core::CatalogSource`, so a player
//! can load its catalog straight from the server.
//!
//! # Example
//!
//! ```ignore
//! use tunebox_server_client::{ServerConfig, TuneboxClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TuneboxClient::new(ServerConfig::new("http://localhost:3000"))?;
//!
//!     let login = client.login("user", "password").await?;
//!     println!("Logged in as {}", login.user.username);
//!
//!     let tracks = client.fetch_catalog().await?;
//!     println!("Found {} tracks", tracks.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod community;
mod error;
mod library;
mod types;
mod upload;

// Re-export main types
pub use client::{TuneboxClient, UploadClientHandle};
pub use error::{Result, ServerClientError};
pub use library::resolve_media_url;
pub use types::{
    ChatMessage, LoginResponse, RawId, RegisterResponse, ServerConfig, ServerSong, UploadMetadata,
    UploadProgress, UserInfo,
};
pub use upload::MAX_UPLOAD_BYTES;

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use community::CommunityClient;
pub use library::LibraryClient;
pub use upload::UploadClient;
