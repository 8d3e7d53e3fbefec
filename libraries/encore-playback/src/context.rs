//! Ordered playback contexts
//!
//! A context is the list a track was picked from. Transitions walk it in
//! order, wrap around it on repeat, or draw from it on shuffle.

use crate::types::ContextKind;
use encore_core::{Track, TrackId};
use serde::{Deserialize, Serialize};

/// The ordered list the current track belongs to
///
/// Non-`None` variants always hold at least one track: the constructors
/// degrade an empty list to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tracks", rename_all = "snake_case")]
pub enum PlaybackContext {
    /// No context
    #[default]
    None,

    /// Tracks of an explicit playlist
    Playlist(Vec<Track>),

    /// The liked set, in display order
    LikedSet(Vec<Track>),

    /// Search results, in result order
    SearchResults(Vec<Track>),
}

impl PlaybackContext {
    /// Playlist context (`None` if empty)
    pub fn playlist(tracks: Vec<Track>) -> Self {
        Self::Playlist(tracks).normalized()
    }

    /// Liked-set context (`None` if empty)
    pub fn liked(tracks: Vec<Track>) -> Self {
        Self::LikedSet(tracks).normalized()
    }

    /// Search-results context (`None` if empty)
    pub fn search_results(tracks: Vec<Track>) -> Self {
        Self::SearchResults(tracks).normalized()
    }

    /// Degrade an empty list to `None`
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.tracks().is_empty() {
            Self::None
        } else {
            self
        }
    }

    /// Tracks in context order (empty for `None`)
    pub fn tracks(&self) -> &[Track] {
        match self {
            Self::None => &[],
            Self::Playlist(tracks) | Self::LikedSet(tracks) | Self::SearchResults(tracks) => {
                tracks
            }
        }
    }

    /// Kind tag without the track list
    pub fn kind(&self) -> ContextKind {
        match self {
            Self::None => ContextKind::None,
            Self::Playlist(_) => ContextKind::Playlist,
            Self::LikedSet(_) => ContextKind::LikedSet,
            Self::SearchResults(_) => ContextKind::SearchResults,
        }
    }

    /// Check for the `None` context
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks().len()
    }

    /// Check if there are no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks().is_empty()
    }

    /// Track at a position
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks().get(index)
    }

    /// Last valid index
    pub fn last_index(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    /// First position of a track id
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks().iter().position(|track| &track.id == id)
    }
}
