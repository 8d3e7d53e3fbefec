//! Playback history tracking
//!
//! Maintains a bounded, de-duplicated list of played tracks for "previous"
//! navigation and the recently-played view.

use encore_core::Track;
use std::collections::VecDeque;

/// Playback history with bounded size
///
/// Most recent track first. A track id appears at most once: playing it
/// again moves the existing entry to the front instead of growing the list.
#[derive(Debug, Clone)]
pub struct History {
    /// History buffer (most recent = front)
    tracks: VecDeque<Track>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            tracks: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Add track to the front of the history
    ///
    /// Removes an earlier entry with the same id, then discards the oldest
    /// entries beyond the size limit.
    pub fn push(&mut self, track: Track) {
        self.tracks.retain(|existing| existing.id != track.id);
        self.tracks.push_front(track);
        self.tracks.truncate(self.max_size);
    }

    /// Get most recent track (without removing)
    pub fn most_recent(&self) -> Option<&Track> {
        self.tracks.front()
    }

    /// Get entry by recency (0 = most recent)
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Iterate most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Get all history tracks (most recent first)
    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.iter().cloned().collect()
    }

    /// Get number of tracks in history
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50) // Default: 50 tracks
    }
}
