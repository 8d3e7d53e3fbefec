//! Recently-played reporting

use crate::remote::spawn_detached;
use encore_core::{MusicApi, TrackId};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Reports every track start to the music service
///
/// Reporting is fire-and-forget: playback never waits for it and ignores
/// its outcome. The local history is kept by the session independently.
#[derive(Clone)]
pub struct RecentlyPlayedRecorder {
    api: Arc<dyn MusicApi>,
}

impl RecentlyPlayedRecorder {
    /// Create a recorder reporting to `api`
    pub fn new(api: Arc<dyn MusicApi>) -> Self {
        Self { api }
    }

    /// Report a track start
    ///
    /// The returned handle may be dropped; it exists so callers can await
    /// delivery when they need to (tests, shutdown).
    pub fn record(&self, track_id: &TrackId) -> Option<JoinHandle<()>> {
        let api = Arc::clone(&self.api);
        let id = track_id.clone();
        spawn_detached("record_recently_played", track_id.clone(), async move {
            api.record_recently_played(&id).await
        })
    }
}

impl std::fmt::Debug for RecentlyPlayedRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentlyPlayedRecorder").finish_non_exhaustive()
    }
}
