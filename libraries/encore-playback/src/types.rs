//! Core types for playback management

use encore_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which kind of ordered list the current track was selected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    /// Played on its own (catalog pick, history jump, random fallback)
    None,

    /// An explicit playlist
    Playlist,

    /// The user's liked tracks
    LikedSet,

    /// The latest search results
    SearchResults,
}

/// What a resolved transition does to the playback context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextChoice {
    /// Stay in the current context at the resolved index
    Keep,

    /// Drop the context; the track plays on its own
    Clear,
}

/// Outcome of a next/previous resolution that switches tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Track to play
    pub track: Track,

    /// Position within the context, `None` when the context is cleared
    pub index: Option<usize>,

    /// Whether the current context survives the switch
    pub context: ContextChoice,
}

impl Resolution {
    pub(crate) fn in_context(track: Track, index: usize) -> Self {
        Self {
            track,
            index: Some(index),
            context: ContextChoice::Keep,
        }
    }

    pub(crate) fn standalone(track: Track) -> Self {
        Self {
            track,
            index: None,
            context: ContextChoice::Clear,
        }
    }
}

/// Result of a transition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Seek the current track back to zero, no track change
    Restart,

    /// Load another track
    Switch(Resolution),
}

/// Configuration for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Maximum history size (default: 50)
    pub history_size: usize,

    /// Seconds into a track after which "previous" restarts it (default: 3)
    pub restart_threshold_secs: u64,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,

    /// Initial repeat flag (default: off)
    pub repeat: bool,
}

impl PlaybackConfig {
    /// Restart threshold as a Duration
    pub fn restart_threshold(&self) -> Duration {
        Duration::from_secs(self.restart_threshold_secs)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            history_size: 50,
            restart_threshold_secs: 3,
            shuffle: false,
            repeat: false,
        }
    }
}

/// User-facing flags that outlive a session
///
/// Persisting them is left to the embedding application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Shuffle enabled
    pub shuffle: bool,

    /// Repeat enabled
    pub repeat: bool,
}
