//! Shared helpers for playback integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use encore_core::{EncoreError, MusicApi, Playlist, PlaylistDraft, PlaylistId, Track, TrackId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Remote call observed by the fake service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Like(String),
    Unlike(String),
    RecentlyPlayed(String),
}

/// In-memory music service
///
/// Mutating calls are reported on an unbounded channel so tests can await
/// fire-and-forget requests.
pub struct FakeApi {
    catalog: Vec<Track>,
    liked: Vec<Track>,
    playlists: HashMap<PlaylistId, Vec<Track>>,
    fail_mutations: bool,
    calls: mpsc::UnboundedSender<ApiCall>,
    log: Mutex<Vec<ApiCall>>,
}

impl FakeApi {
    pub fn new(catalog: Vec<Track>) -> (Self, mpsc::UnboundedReceiver<ApiCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        let api = Self {
            catalog,
            liked: Vec::new(),
            playlists: HashMap::new(),
            fail_mutations: false,
            calls,
            log: Mutex::new(Vec::new()),
        };
        (api, rx)
    }

    pub fn with_liked(mut self, liked: Vec<Track>) -> Self {
        self.liked = liked;
        self
    }

    pub fn with_playlist(mut self, id: &str, tracks: Vec<Track>) -> Self {
        self.playlists.insert(PlaylistId::new(id), tracks);
        self
    }

    pub fn failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    fn observe(&self, call: ApiCall) -> encore_core::Result<()> {
        self.log.lock().unwrap().push(call.clone());
        let _ = self.calls.send(call);
        if self.fail_mutations {
            Err(EncoreError::network("connection reset"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MusicApi for FakeApi {
    async fn fetch_catalog(&self) -> encore_core::Result<Vec<Track>> {
        Ok(self.catalog.clone())
    }

    async fn fetch_liked_tracks(&self) -> encore_core::Result<Vec<Track>> {
        Ok(self.liked.clone())
    }

    async fn like_track(&self, track_id: &TrackId) -> encore_core::Result<()> {
        self.observe(ApiCall::Like(track_id.to_string()))
    }

    async fn unlike_track(&self, track_id: &TrackId) -> encore_core::Result<()> {
        self.observe(ApiCall::Unlike(track_id.to_string()))
    }

    async fn record_recently_played(&self, track_id: &TrackId) -> encore_core::Result<()> {
        self.observe(ApiCall::RecentlyPlayed(track_id.to_string()))
    }

    async fn fetch_playlist(&self, playlist_id: &PlaylistId) -> encore_core::Result<Vec<Track>> {
        self.playlists
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| EncoreError::not_found("playlist", playlist_id.as_str()))
    }

    async fn search_tracks(&self, query: &str) -> encore_core::Result<Vec<Track>> {
        let query = query.to_lowercase();
        Ok(self
            .catalog
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&query) || t.artist.to_lowercase().contains(&query)
            })
            .cloned()
            .collect())
    }

    async fn fetch_recently_played(&self) -> encore_core::Result<Vec<Track>> {
        Ok(Vec::new())
    }

    async fn fetch_playlists(&self) -> encore_core::Result<Vec<Playlist>> {
        Ok(self
            .playlists
            .keys()
            .map(|id| Playlist::new(id.clone(), format!("Playlist {}", id)))
            .collect())
    }

    // Playlist editing is not exercised by the playback engine
    async fn create_playlist(&self, _draft: &PlaylistDraft) -> encore_core::Result<Playlist> {
        Err(EncoreError::Other("read-only fake".to_string()))
    }

    async fn update_playlist(
        &self,
        _playlist_id: &PlaylistId,
        _draft: &PlaylistDraft,
    ) -> encore_core::Result<Playlist> {
        Err(EncoreError::Other("read-only fake".to_string()))
    }

    async fn delete_playlist(&self, _playlist_id: &PlaylistId) -> encore_core::Result<()> {
        Err(EncoreError::Other("read-only fake".to_string()))
    }

    async fn add_to_playlist(
        &self,
        _playlist_id: &PlaylistId,
        _track_id: &TrackId,
    ) -> encore_core::Result<()> {
        Err(EncoreError::Other("read-only fake".to_string()))
    }

    async fn remove_from_playlist(
        &self,
        _playlist_id: &PlaylistId,
        _track_id: &TrackId,
    ) -> encore_core::Result<()> {
        Err(EncoreError::Other("read-only fake".to_string()))
    }
}

pub fn create_test_track(id: &str) -> Track {
    Track::new(id, format!("Track {}", id), "Test Artist")
        .with_duration_seconds(180)
        .with_audio_url(format!("/uploads/audio/{}.mp3", id))
}

pub fn create_test_tracks(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| create_test_track(id)).collect()
}

pub fn as_api(api: FakeApi) -> Arc<dyn MusicApi> {
    Arc::new(api)
}
