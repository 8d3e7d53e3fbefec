//! Encore - Playback Session Management
//!
//! Platform-agnostic playback state for Encore.
//!
//! This crate provides:
//! - Playback session (current track, ordered context, shuffle/repeat flags)
//! - Transition resolution for next, previous and track end
//! - Playback history (bounded, de-duplicated, most recent first)
//! - Liked-set tracking with optimistic remote sync
//! - Recently-played reporting
//! - A serialized controller task for UI front ends
//!
//! # Architecture
//!
//! `encore-playback` never touches audio or the network directly:
//! - Audio output belongs to the front end; it reports position and track
//!   end back to the [`Player`]
//! - Remote calls go through [`encore_core::MusicApi`] and are sent in the
//!   background without blocking playback
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use encore_core::{MockMusicApi, MusicApi, Track};
//! use encore_playback::{PlaybackConfig, PlaybackContext, Player};
//! use std::sync::Arc;
//!
//! let api: Arc<dyn MusicApi> = Arc::new(MockMusicApi::new());
//! let mut player = Player::new(PlaybackConfig::default(), api);
//!
//! let tracks = vec![
//!     Track::new("1", "First", "Artist"),
//!     Track::new("2", "Second", "Artist"),
//! ];
//! player.play(tracks[0].clone(), PlaybackContext::playlist(tracks), Some(0));
//!
//! assert!(player.next());
//! assert_eq!(player.current_track().unwrap().id.as_str(), "2");
//! assert!(player.queue_preview().is_empty());
//! ```
//!
//! # Example: Controller
//!
//! ```rust,no_run
//! use encore_playback::{Player, PlayerController};
//! # async fn run(player: Player) -> encore_playback::Result<()> {
//! let handle = PlayerController::spawn(player);
//! let mut events = handle.subscribe();
//!
//! handle.hydrate().await?;
//! handle.play_from_catalog(0).await?;
//! handle.next().await?;
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

mod context;
mod controller;
mod error;
mod events;
mod history;
mod liked;
mod player;
mod recorder;
mod remote;
pub mod resolver;
mod session;
pub mod types;

// Public exports
pub use context::PlaybackContext;
pub use controller::{PlayerController, PlayerHandle};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use history::History;
pub use liked::{LikeChange, LikeSync, LikedTracks};
pub use player::{Player, PlayerSnapshot};
pub use recorder::RecentlyPlayedRecorder;
pub use session::PlaybackSession;
pub use types::{
    ContextChoice, ContextKind, PlaybackConfig, PlayerSettings, Resolution, Transition,
};
