//! Player events
//!
//! Event-based communication for UI synchronization. Events are queued by
//! the player at each state change and drained by the front end.

use crate::types::ContextKind;
use encore_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// A new track became current
    TrackChanged {
        /// ID of the new track
        track_id: TrackId,
        /// Title of the new track
        title: String,
        /// Artist of the new track
        artist: String,
        /// Audio locator, `None` when the track has nothing to play
        audio_url: Option<String>,
        /// Context the track plays in
        context: ContextKind,
        /// Position in the context
        index: Option<usize>,
    },

    /// The current track was sent back to its start
    Restarted {
        /// ID of the restarted track
        track_id: TrackId,
    },

    /// Playing/paused flag changed
    PlayStateChanged {
        /// Whether media is now playing
        is_playing: bool,
    },

    /// Position jumped
    Seeked {
        /// New position in seconds
        position_seconds: f64,
    },

    /// Shuffle flag toggled
    ShuffleChanged {
        /// New shuffle flag
        enabled: bool,
    },

    /// Repeat flag toggled
    RepeatChanged {
        /// New repeat flag
        enabled: bool,
    },

    /// A track entered or left the liked set
    LikeChanged {
        /// ID of the toggled track
        track_id: TrackId,
        /// Whether the track is liked now
        liked: bool,
    },
}
