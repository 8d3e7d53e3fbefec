//! Encore Client
//!
//! HTTP client library for the Encore music service API.
//!
//! # Features
//!
//! - **Authentication**: Sign-up and login with email/password, bearer token storage
//! - **Catalog**: All songs, search, liked songs, recently played
//! - **Playlists**: List, create, rename and delete playlists; add and remove songs
//! - **Mutations**: Like/unlike, recently-played reporting
//!
//! [`EncoreClient`] implements [`encore_core::MusicApi`] and
//! [`encore_core::AccountApi`], so it can be handed straight to the playback
//! engine and the front end.
//!
//! # Example
//!
//! ```ignore
//! use encore_client::{ClientConfig, EncoreClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EncoreClient::new(ClientConfig::new("http://localhost:5000"))?;
//!
//!     let login = client.login("listener@example.com", "hunter22").await?;
//!     println!("Logged in as {:?}", login.name);
//!
//!     let songs = client.get_songs().await?;
//!     println!("Found {} songs", songs.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod library;
mod types;

// Re-export main types
pub use client::EncoreClient;
pub use error::{ClientError, Result};
pub use types::{ClientConfig, LoginResponse, ServerPlaylist, ServerSong};
