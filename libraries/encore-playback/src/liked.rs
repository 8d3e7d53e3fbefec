//! Liked-set tracking
//!
//! Local membership is updated immediately on toggle; the matching
//! like/unlike request is sent in the background with no rollback if it
//! fails. The set only resynchronizes on the next full hydration.

use crate::remote::spawn_detached;
use encore_core::{MusicApi, Track, TrackId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Direction of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeChange {
    /// Track was added to the liked set
    Liked,

    /// Track was removed from the liked set
    Unliked,
}

impl LikeChange {
    /// Whether the track is liked after the change
    pub fn is_liked(self) -> bool {
        self == Self::Liked
    }
}

/// Set of liked track ids, with insertion order kept for display
#[derive(Debug, Clone, Default)]
pub struct LikedTracks {
    ids: HashSet<TrackId>,
    tracks: Vec<Track>,
    hydrated: bool,
}

impl LikedTracks {
    /// Create an empty, not yet hydrated set
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the set from the service
    ///
    /// Only the first hydration takes effect; afterwards the set is mutated
    /// in place by toggles. Returns whether the tracks were taken.
    pub fn hydrate(&mut self, tracks: Vec<Track>) -> bool {
        if self.hydrated {
            debug!("Liked set already hydrated, ignoring refetch");
            return false;
        }

        for track in tracks {
            if self.ids.insert(track.id.clone()) {
                self.tracks.push(track);
            }
        }
        self.hydrated = true;
        true
    }

    /// Whether the set has been hydrated
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Membership by id
    pub fn is_liked(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    /// Flip membership of a track locally
    pub fn toggle(&mut self, track: &Track) -> LikeChange {
        if self.ids.remove(&track.id) {
            self.tracks.retain(|t| t.id != track.id);
            LikeChange::Unliked
        } else {
            self.ids.insert(track.id.clone());
            self.tracks.push(track.clone());
            LikeChange::Liked
        }
    }

    /// Liked tracks in insertion order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of liked tracks
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if nothing is liked
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Sends like/unlike requests matching local toggles
#[derive(Clone)]
pub struct LikeSync {
    api: Arc<dyn MusicApi>,
}

impl LikeSync {
    /// Create a sync sender for `api`
    pub fn new(api: Arc<dyn MusicApi>) -> Self {
        Self { api }
    }

    /// Send the request for a local change, without waiting for it
    pub fn push(&self, track_id: &TrackId, change: LikeChange) -> Option<JoinHandle<()>> {
        let api = Arc::clone(&self.api);
        let id = track_id.clone();
        match change {
            LikeChange::Liked => spawn_detached("like_track", track_id.clone(), async move {
                api.like_track(&id).await
            }),
            LikeChange::Unliked => spawn_detached("unlike_track", track_id.clone(), async move {
                api.unlike_track(&id).await
            }),
        }
    }
}

impl std::fmt::Debug for LikeSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeSync").finish_non_exhaustive()
    }
}
