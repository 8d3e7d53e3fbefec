/// Core traits for Encore
use crate::error::Result;
use crate::types::{Account, Playlist, PlaylistDraft, PlaylistId, Registration, Track, TrackId};
use async_trait::async_trait;

/// Contract of the remote music service
///
/// The playback engine only ever talks to the backend through this trait,
/// which keeps it testable without a network. `encore-client` provides the
/// HTTP implementation.
///
/// # Mocking Support
///
/// With the `mock` feature enabled this crate exports `MockMusicApi`,
/// generated by `mockall`.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// Fetch the full song catalog
    async fn fetch_catalog(&self) -> Result<Vec<Track>>;

    /// Fetch the tracks the current user has liked
    async fn fetch_liked_tracks(&self) -> Result<Vec<Track>>;

    /// Mark a track as liked
    async fn like_track(&self, track_id: &TrackId) -> Result<()>;

    /// Remove a track from the liked set
    async fn unlike_track(&self, track_id: &TrackId) -> Result<()>;

    /// Report that playback of a track started
    async fn record_recently_played(&self, track_id: &TrackId) -> Result<()>;

    /// Fetch the ordered tracks of a playlist
    async fn fetch_playlist(&self, playlist_id: &PlaylistId) -> Result<Vec<Track>>;

    /// Search the catalog by title, artist or album
    async fn search_tracks(&self, query: &str) -> Result<Vec<Track>>;

    /// Fetch the user's recently played tracks, most recent first
    async fn fetch_recently_played(&self) -> Result<Vec<Track>>;

    /// List the user's playlists
    async fn fetch_playlists(&self) -> Result<Vec<Playlist>>;

    /// Create a playlist owned by the current user
    async fn create_playlist(&self, draft: &PlaylistDraft) -> Result<Playlist>;

    /// Replace a playlist's name and cover
    async fn update_playlist(&self, playlist_id: &PlaylistId, draft: &PlaylistDraft)
        -> Result<Playlist>;

    /// Delete a playlist
    async fn delete_playlist(&self, playlist_id: &PlaylistId) -> Result<()>;

    /// Append a track to a playlist
    async fn add_to_playlist(&self, playlist_id: &PlaylistId, track_id: &TrackId) -> Result<()>;

    /// Remove a track from a playlist
    async fn remove_from_playlist(&self, playlist_id: &PlaylistId, track_id: &TrackId)
        -> Result<()>;
}

/// Sign-up and sign-in against the music service
///
/// Implementations keep the issued token for later `MusicApi` calls.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Create an account and sign in as it
    async fn register(&self, registration: &Registration) -> Result<Account>;

    /// Sign in with email and password
    async fn login(&self, email: &str, password: &str) -> Result<Account>;
}
