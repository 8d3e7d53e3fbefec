//! Playback session state
//!
//! Single source of truth for what is playing and in which ordered context.
//! The session is plain data: it performs no I/O and never picks tracks on
//! its own. Transitions are computed by [`crate::resolver`] and applied here.

use crate::context::PlaybackContext;
use crate::history::History;
use crate::types::{ContextChoice, PlaybackConfig, Resolution};
use encore_core::Track;

/// What is playing, from where, and with which flags
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    current_track: Option<Track>,
    context: PlaybackContext,
    current_index: Option<usize>,
    shuffle_enabled: bool,
    repeat_enabled: bool,
    history: History,
}

impl PlaybackSession {
    /// Create an empty session
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            current_track: None,
            context: PlaybackContext::None,
            current_index: None,
            shuffle_enabled: config.shuffle,
            repeat_enabled: config.repeat,
            history: History::new(config.history_size),
        }
    }

    /// Make `track` the current track
    ///
    /// The index is kept only if it points inside the (non-empty) context.
    /// An out-of-range index is not taken as "no position": like a missing
    /// index it falls back to looking the track up in the context by id, so
    /// the current index is `None` only when the track is not in the context.
    /// The track is pushed to the front of the history. Flags are untouched.
    pub fn play_track(&mut self, track: Track, context: PlaybackContext, index: Option<usize>) {
        let context = context.normalized();
        let index = index
            .filter(|&i| i < context.len())
            .or_else(|| context.position_of(&track.id));

        self.context = context;
        self.current_index = index;
        self.set_current(track);
    }

    /// Apply a resolved transition
    pub fn apply(&mut self, resolution: Resolution) {
        let Resolution {
            track,
            index,
            context,
        } = resolution;

        match context {
            ContextChoice::Keep => {
                self.current_index = index.filter(|&i| i < self.context.len());
            }
            ContextChoice::Clear => {
                self.context = PlaybackContext::None;
                self.current_index = None;
            }
        }

        self.set_current(track);
    }

    fn set_current(&mut self, track: Track) {
        self.history.push(track.clone());
        self.current_track = Some(track);
    }

    /// Set shuffle flag
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle_enabled = enabled;
    }

    /// Set repeat flag
    pub fn set_repeat(&mut self, enabled: bool) {
        self.repeat_enabled = enabled;
    }

    /// Shuffle flag
    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    /// Repeat flag
    pub fn repeat_enabled(&self) -> bool {
        self.repeat_enabled
    }

    /// Currently playing track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Current context
    pub fn context(&self) -> &PlaybackContext {
        &self.context
    }

    /// Position of the current track within the context
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Played tracks, most recent first
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Tracks that follow the current one in the context
    ///
    /// Empty when there is no context. With a context but no known index,
    /// the whole context is upcoming.
    pub fn queue_preview(&self) -> &[Track] {
        let start = self.current_index.map_or(0, |i| i + 1);
        self.context.tracks().get(start..).unwrap_or(&[])
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}
