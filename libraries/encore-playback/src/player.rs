//! Player - the state container the UI talks to
//!
//! Owns the catalog, the liked set, the playback session and the media-facing
//! state (playing flag, position). Track changes are resolved by
//! [`crate::resolver`] and reported to the music service in the background.

use crate::context::PlaybackContext;
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::history::History;
use crate::liked::{LikeSync, LikedTracks};
use crate::recorder::RecentlyPlayedRecorder;
use crate::resolver::{resolve_next, resolve_previous, resolve_track_end};
use crate::session::PlaybackSession;
use crate::types::{ContextKind, PlaybackConfig, PlayerSettings, Transition};
use encore_core::{MusicApi, PlaylistId, Track};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Serializable summary of everything the UI renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Track being played
    pub current_track: Option<Track>,
    /// Context kind of the current track
    pub context: ContextKind,
    /// Position of the current track in its context
    pub current_index: Option<usize>,
    /// Media playing flag
    pub is_playing: bool,
    /// Position in the current track
    pub current_time_seconds: f64,
    /// Length of the current track
    pub duration_seconds: u32,
    /// Shuffle flag
    pub shuffle_enabled: bool,
    /// Repeat flag
    pub repeat_enabled: bool,
    /// Whether the current track is liked
    pub current_liked: bool,
    /// Tracks after the current one in its context
    pub queue_preview: Vec<Track>,
    /// Recently played tracks, most recent first
    pub history: Vec<Track>,
}

/// Playback state container
pub struct Player {
    config: PlaybackConfig,
    api: Arc<dyn MusicApi>,
    catalog: Vec<Track>,
    liked: LikedTracks,
    like_sync: LikeSync,
    recorder: RecentlyPlayedRecorder,
    session: PlaybackSession,
    search_results: Vec<Track>,
    rng: StdRng,
    is_playing: bool,
    position: Duration,
    pending_events: Vec<PlayerEvent>,
}

impl Player {
    /// Create a player backed by `api`
    pub fn new(config: PlaybackConfig, api: Arc<dyn MusicApi>) -> Self {
        Self::with_rng(config, api, StdRng::from_entropy())
    }

    /// Create a player with a given random source (deterministic tests)
    pub fn with_rng(config: PlaybackConfig, api: Arc<dyn MusicApi>, rng: StdRng) -> Self {
        Self {
            session: PlaybackSession::new(&config),
            like_sync: LikeSync::new(Arc::clone(&api)),
            recorder: RecentlyPlayedRecorder::new(Arc::clone(&api)),
            config,
            api,
            catalog: Vec::new(),
            liked: LikedTracks::new(),
            search_results: Vec::new(),
            rng,
            is_playing: false,
            position: Duration::ZERO,
            pending_events: Vec::new(),
        }
    }

    // ===== Remote data =====

    /// Fetch the catalog and the liked set concurrently
    ///
    /// A failing catalog fetch is an error. A failing liked-set fetch (for
    /// example when signed out) only leaves the liked set empty.
    pub async fn hydrate(&mut self) -> Result<()> {
        let (catalog, liked) =
            tokio::join!(self.api.fetch_catalog(), self.api.fetch_liked_tracks());

        self.catalog = catalog?;
        info!(tracks = self.catalog.len(), "Catalog loaded");

        match liked {
            Ok(tracks) => {
                if self.liked.hydrate(tracks) {
                    info!(liked = self.liked.len(), "Liked set loaded");
                }
            }
            Err(e) => warn!(error = %e, "Failed to load liked tracks"),
        }

        Ok(())
    }

    /// Fetch a playlist and start playing it at `index`
    pub async fn open_playlist(&mut self, playlist_id: &PlaylistId, index: usize) -> Result<()> {
        let tracks = self.api.fetch_playlist(playlist_id).await?;
        debug!(playlist_id = %playlist_id, tracks = tracks.len(), "Playlist fetched");
        self.play_playlist(tracks, index)
    }

    /// Run a search and keep its results as the search-results list
    pub async fn search(&mut self, query: &str) -> Result<&[Track]> {
        let results = self.api.search_tracks(query).await?;
        self.set_search_results(results);
        Ok(&self.search_results)
    }

    // ===== Play commands =====

    /// Make `track` current within `context`
    ///
    /// `index` is used when it points inside the context; a missing or
    /// out-of-range index falls back to looking the track up by id.
    pub fn play(&mut self, track: Track, context: PlaybackContext, index: Option<usize>) {
        self.session.play_track(track, context, index);
        self.on_track_started();
    }

    /// Play a catalog track on its own
    pub fn play_from_catalog(&mut self, index: usize) -> Result<()> {
        let track = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.play(track, PlaybackContext::None, None);
        Ok(())
    }

    /// Play the liked set starting at `index`
    pub fn play_liked(&mut self, index: usize) -> Result<()> {
        let tracks = self.liked.tracks().to_vec();
        let track = tracks
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.play(track, PlaybackContext::liked(tracks), Some(index));
        Ok(())
    }

    /// Play the current search results starting at `index`
    pub fn play_search_result(&mut self, index: usize) -> Result<()> {
        let track = self
            .search_results
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        let context = PlaybackContext::search_results(self.search_results.clone());
        self.play(track, context, Some(index));
        Ok(())
    }

    /// Play an already fetched playlist starting at `index`
    pub fn play_playlist(&mut self, tracks: Vec<Track>, index: usize) -> Result<()> {
        let track = tracks
            .get(index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;
        self.play(track, PlaybackContext::playlist(tracks), Some(index));
        Ok(())
    }

    /// Replace the search-results list
    ///
    /// A context already built from older results is not affected.
    pub fn set_search_results(&mut self, tracks: Vec<Track>) {
        self.search_results = tracks;
    }

    // ===== Transport =====

    /// Skip to the next track
    ///
    /// Returns `false` when there is nowhere to go; state is left untouched.
    pub fn next(&mut self) -> bool {
        match resolve_next(&self.session, &self.catalog, &mut self.rng) {
            Some(resolution) => {
                self.session.apply(resolution);
                self.on_track_started();
                true
            }
            None => {
                debug!("No next track available");
                false
            }
        }
    }

    /// Previous button: restart, step back, or jump to the last played track
    pub fn previous(&mut self) -> bool {
        let transition = resolve_previous(
            &self.session,
            &self.catalog,
            self.position,
            self.config.restart_threshold(),
            &mut self.rng,
        );

        match transition {
            Some(Transition::Restart) => {
                self.restart();
                true
            }
            Some(Transition::Switch(resolution)) => {
                self.session.apply(resolution);
                self.on_track_started();
                true
            }
            None => {
                debug!("No previous track available");
                false
            }
        }
    }

    /// The media reached the end of the current track
    ///
    /// Returns `false` when nothing can follow; the track stays loaded and
    /// the play state is left as the media layer reported it.
    pub fn track_ended(&mut self) -> bool {
        match resolve_track_end(&self.session, &self.catalog, &mut self.rng) {
            Some(Transition::Restart) => {
                self.restart();
                self.set_playing(true);
                true
            }
            Some(Transition::Switch(resolution)) => {
                self.session.apply(resolution);
                self.on_track_started();
                true
            }
            None => {
                debug!("Track ended with nothing to follow");
                false
            }
        }
    }

    /// Flip the shuffle flag, returning the new value
    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = !self.session.shuffle_enabled();
        self.session.set_shuffle(enabled);
        self.emit(PlayerEvent::ShuffleChanged { enabled });
        enabled
    }

    /// Flip the repeat flag, returning the new value
    pub fn toggle_repeat(&mut self) -> bool {
        let enabled = !self.session.repeat_enabled();
        self.session.set_repeat(enabled);
        self.emit(PlayerEvent::RepeatChanged { enabled });
        enabled
    }

    /// Jump to `seconds` in the current track
    ///
    /// Positions past the end are clamped to the track duration when it is
    /// known.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        let track = self
            .session
            .current_track()
            .ok_or(PlaybackError::NoTrackLoaded)?;

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(PlaybackError::InvalidSeekPosition(seconds));
        }

        let clamped = match track.duration_seconds {
            0 => seconds,
            duration => seconds.min(f64::from(duration)),
        };

        self.position = Duration::try_from_secs_f64(clamped)
            .map_err(|_| PlaybackError::InvalidSeekPosition(seconds))?;
        self.emit(PlayerEvent::Seeked {
            position_seconds: clamped,
        });
        Ok(())
    }

    // ===== Media state =====

    /// Position update from the media element
    ///
    /// Invalid values are ignored.
    pub fn set_position(&mut self, seconds: f64) {
        if let Ok(position) = Duration::try_from_secs_f64(seconds) {
            self.position = position;
        }
    }

    /// Pause the media
    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    /// Resume the media; no-op without a current track
    pub fn resume(&mut self) {
        if self.session.current_track().is_some() {
            self.set_playing(true);
        }
    }

    // ===== Likes =====

    /// Flip the liked state of `track`, returning the new state
    ///
    /// The local set changes immediately; the remote request is sent in the
    /// background and never rolled back.
    pub fn toggle_like(&mut self, track: &Track) -> bool {
        let change = self.liked.toggle(track);
        self.like_sync.push(&track.id, change);

        let liked = change.is_liked();
        self.emit(PlayerEvent::LikeChanged {
            track_id: track.id.clone(),
            liked,
        });
        liked
    }

    /// Flip the liked state of the current track
    pub fn toggle_like_current(&mut self) -> Result<bool> {
        let track = self
            .session
            .current_track()
            .cloned()
            .ok_or(PlaybackError::NoTrackLoaded)?;
        Ok(self.toggle_like(&track))
    }

    /// Whether `track` is in the liked set
    pub fn is_liked(&self, track: &Track) -> bool {
        self.liked.is_liked(&track.id)
    }

    // ===== Accessors =====

    /// Track being played
    pub fn current_track(&self) -> Option<&Track> {
        self.session.current_track()
    }

    /// Media playing flag
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Position in the current track
    pub fn current_time_seconds(&self) -> f64 {
        self.position.as_secs_f64()
    }

    /// Length of the current track, 0 when unknown or nothing is loaded
    pub fn duration_seconds(&self) -> u32 {
        self.session
            .current_track()
            .map_or(0, |t| t.duration_seconds)
    }

    /// Shuffle flag
    pub fn shuffle_enabled(&self) -> bool {
        self.session.shuffle_enabled()
    }

    /// Repeat flag
    pub fn repeat_enabled(&self) -> bool {
        self.session.repeat_enabled()
    }

    /// Tracks after the current one in its context
    pub fn queue_preview(&self) -> &[Track] {
        self.session.queue_preview()
    }

    /// Local playback history
    pub fn history(&self) -> &History {
        self.session.history()
    }

    /// Liked tracks in insertion order
    pub fn liked_tracks(&self) -> &[Track] {
        self.liked.tracks()
    }

    /// The full song catalog
    pub fn catalog(&self) -> &[Track] {
        &self.catalog
    }

    /// The latest search results
    pub fn search_results(&self) -> &[Track] {
        &self.search_results
    }

    /// Underlying session state
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    // ===== Settings =====

    /// Flags worth persisting across runs
    pub fn settings(&self) -> PlayerSettings {
        PlayerSettings {
            shuffle: self.session.shuffle_enabled(),
            repeat: self.session.repeat_enabled(),
        }
    }

    /// Restore persisted flags without emitting events
    pub fn apply_settings(&mut self, settings: PlayerSettings) {
        self.session.set_shuffle(settings.shuffle);
        self.session.set_repeat(settings.repeat);
    }

    /// Summarize the exposed state
    pub fn snapshot(&self) -> PlayerSnapshot {
        let current_track = self.session.current_track().cloned();
        let current_liked = current_track
            .as_ref()
            .is_some_and(|t| self.liked.is_liked(&t.id));

        PlayerSnapshot {
            context: self.session.context().kind(),
            current_index: self.session.current_index(),
            is_playing: self.is_playing,
            current_time_seconds: self.current_time_seconds(),
            duration_seconds: self.duration_seconds(),
            shuffle_enabled: self.session.shuffle_enabled(),
            repeat_enabled: self.session.repeat_enabled(),
            current_liked,
            queue_preview: self.session.queue_preview().to_vec(),
            history: self.session.history().to_vec(),
            current_track,
        }
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn on_track_started(&mut self) {
        let Some(track) = self.session.current_track() else {
            return;
        };

        if !track.has_audio() {
            warn!(track_id = %track.id, title = %track.title, "Track has no audio locator");
        }
        self.recorder.record(&track.id);

        let event = PlayerEvent::TrackChanged {
            track_id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            audio_url: track.audio_url.clone(),
            context: self.session.context().kind(),
            index: self.session.current_index(),
        };
        debug!(track_id = %track.id, index = ?self.session.current_index(), "Track changed");

        self.position = Duration::ZERO;
        self.emit(event);
        self.set_playing(true);
    }

    fn restart(&mut self) {
        let Some(track_id) = self.session.current_track().map(|t| t.id.clone()) else {
            return;
        };
        self.position = Duration::ZERO;
        self.emit(PlayerEvent::Restarted { track_id });
    }

    fn set_playing(&mut self, is_playing: bool) {
        if self.is_playing != is_playing {
            self.is_playing = is_playing;
            self.emit(PlayerEvent::PlayStateChanged { is_playing });
        }
    }

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("session", &self.session)
            .field("catalog", &self.catalog.len())
            .field("liked", &self.liked.len())
            .field("is_playing", &self.is_playing)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}
