//! Encore Core
//!
//! Platform-agnostic core types, traits, and error handling for Encore.
//!
//! This crate provides the building blocks shared by the playback engine,
//! the HTTP client and the terminal front end.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, and their identifiers
//! - **Core Traits**: `MusicApi`, the contract of the remote music service,
//!   and `AccountApi` for sign-up and sign-in
//! - **Error Handling**: Unified `EncoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use encore_core::types::{Track, TrackId};
//!
//! let track = Track::new("42", "Back to Friends", "sombr")
//!     .with_album("I Barely Know Her")
//!     .with_duration_seconds(199)
//!     .with_audio_url("/uploads/audio/back-to-friends.mp3");
//!
//! assert_eq!(track.id, TrackId::new("42"));
//! assert!(track.has_audio());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{EncoreError, Result};
pub use traits::{AccountApi, MusicApi};
pub use types::{Account, Playlist, PlaylistDraft, PlaylistId, Registration, Track, TrackId};

#[cfg(feature = "mock")]
pub use traits::{MockAccountApi, MockMusicApi};
