//! Prompt tests against an in-memory music service

use async_trait::async_trait;
use encore_cli::{Flow, Repl};
use encore_core::{
    Account, AccountApi, EncoreError, MusicApi, Playlist, PlaylistDraft, PlaylistId,
    Registration, Track, TrackId,
};
use encore_playback::{ContextKind, PlaybackConfig, Player, PlayerController, PlayerHandle};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory service with editable playlists
struct StaticApi {
    catalog: Vec<Track>,
    playlists: Mutex<BTreeMap<String, (Playlist, Vec<Track>)>>,
}

impl StaticApi {
    fn playlist_ids(&self, id: &str) -> Option<Vec<String>> {
        self.playlists
            .lock()
            .unwrap()
            .get(id)
            .map(|(_, tracks)| tracks.iter().map(|t| t.id.to_string()).collect())
    }

    fn playlist(&self, id: &str) -> Option<Playlist> {
        self.playlists.lock().unwrap().get(id).map(|(p, _)| p.clone())
    }
}

fn missing(playlist_id: &PlaylistId) -> EncoreError {
    EncoreError::not_found("playlist", playlist_id.as_str())
}

#[async_trait]
impl MusicApi for StaticApi {
    async fn fetch_catalog(&self) -> encore_core::Result<Vec<Track>> {
        Ok(self.catalog.clone())
    }

    async fn fetch_liked_tracks(&self) -> encore_core::Result<Vec<Track>> {
        Ok(Vec::new())
    }

    async fn like_track(&self, _track_id: &TrackId) -> encore_core::Result<()> {
        Ok(())
    }

    async fn unlike_track(&self, _track_id: &TrackId) -> encore_core::Result<()> {
        Ok(())
    }

    async fn record_recently_played(&self, _track_id: &TrackId) -> encore_core::Result<()> {
        Ok(())
    }

    async fn fetch_playlist(&self, playlist_id: &PlaylistId) -> encore_core::Result<Vec<Track>> {
        self.playlists
            .lock()
            .unwrap()
            .get(playlist_id.as_str())
            .map(|(_, tracks)| tracks.clone())
            .ok_or_else(|| missing(playlist_id))
    }

    async fn search_tracks(&self, query: &str) -> encore_core::Result<Vec<Track>> {
        Ok(self
            .catalog
            .iter()
            .filter(|t| t.title.contains(query))
            .cloned()
            .collect())
    }

    async fn fetch_recently_played(&self) -> encore_core::Result<Vec<Track>> {
        Ok(self.catalog.iter().rev().cloned().collect())
    }

    async fn fetch_playlists(&self) -> encore_core::Result<Vec<Playlist>> {
        Ok(self
            .playlists
            .lock()
            .unwrap()
            .values()
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn create_playlist(&self, draft: &PlaylistDraft) -> encore_core::Result<Playlist> {
        let mut playlists = self.playlists.lock().unwrap();
        let id = (playlists.len() + 100).to_string();
        let mut playlist = Playlist::new(id.as_str(), draft.name.as_str());
        playlist.image_url = draft.image_url.clone();
        playlists.insert(id, (playlist.clone(), Vec::new()));
        Ok(playlist)
    }

    async fn update_playlist(
        &self,
        playlist_id: &PlaylistId,
        draft: &PlaylistDraft,
    ) -> encore_core::Result<Playlist> {
        let mut playlists = self.playlists.lock().unwrap();
        let (playlist, _) = playlists
            .get_mut(playlist_id.as_str())
            .ok_or_else(|| missing(playlist_id))?;
        playlist.name = draft.name.clone();
        playlist.image_url = draft.image_url.clone();
        Ok(playlist.clone())
    }

    async fn delete_playlist(&self, playlist_id: &PlaylistId) -> encore_core::Result<()> {
        self.playlists
            .lock()
            .unwrap()
            .remove(playlist_id.as_str())
            .map(|_| ())
            .ok_or_else(|| missing(playlist_id))
    }

    async fn add_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> encore_core::Result<()> {
        let track = self
            .catalog
            .iter()
            .find(|t| t.id == *track_id)
            .cloned()
            .ok_or_else(|| EncoreError::not_found("track", track_id.as_str()))?;
        let mut playlists = self.playlists.lock().unwrap();
        let (_, tracks) = playlists
            .get_mut(playlist_id.as_str())
            .ok_or_else(|| missing(playlist_id))?;
        tracks.push(track);
        Ok(())
    }

    async fn remove_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> encore_core::Result<()> {
        let mut playlists = self.playlists.lock().unwrap();
        let (_, tracks) = playlists
            .get_mut(playlist_id.as_str())
            .ok_or_else(|| missing(playlist_id))?;
        tracks.retain(|t| t.id != *track_id);
        Ok(())
    }
}

/// Accepts one existing account and any valid sign-up
#[derive(Default)]
struct FakeAccounts {
    signed_in: Mutex<Option<String>>,
}

#[async_trait]
impl AccountApi for FakeAccounts {
    async fn register(&self, registration: &Registration) -> encore_core::Result<Account> {
        if registration.email == "taken@example.com" {
            return Err(EncoreError::invalid_input("Email already registered."));
        }
        *self.signed_in.lock().unwrap() = Some(registration.email.clone());
        Ok(Account {
            name: Some(registration.name.clone()),
            is_admin: false,
        })
    }

    async fn login(&self, email: &str, password: &str) -> encore_core::Result<Account> {
        if email == "me@example.com" && password == "password123" {
            *self.signed_in.lock().unwrap() = Some(email.to_string());
            Ok(Account {
                name: Some("Me".to_string()),
                is_admin: false,
            })
        } else {
            Err(EncoreError::Api {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        }
    }
}

fn track(id: &str) -> Track {
    Track::new(id, format!("Track {}", id), "Artist")
        .with_duration_seconds(120)
        .with_audio_url(format!("/uploads/audio/{}.mp3", id))
}

async fn setup() -> (Repl<Vec<u8>>, PlayerHandle) {
    let (repl, handle, _, _) = setup_with_state().await;
    (repl, handle)
}

async fn setup_with_state() -> (Repl<Vec<u8>>, PlayerHandle, Arc<StaticApi>, Arc<FakeAccounts>) {
    let catalog: Vec<Track> = ["a", "b", "c"].iter().map(|id| track(id)).collect();
    let mut playlists = BTreeMap::new();
    playlists.insert(
        "mix".to_string(),
        (
            Playlist::new("mix", "Evening mix"),
            vec![track("c"), track("a")],
        ),
    );
    let state = Arc::new(StaticApi {
        catalog,
        playlists: Mutex::new(playlists),
    });
    let accounts = Arc::new(FakeAccounts::default());
    let api: Arc<dyn MusicApi> = state.clone();

    let handle = PlayerController::spawn(Player::new(PlaybackConfig::default(), Arc::clone(&api)));
    handle.hydrate().await.unwrap();

    let repl = Repl::new(handle.clone(), api, Vec::new()).with_accounts(accounts.clone());
    (repl, handle, state, accounts)
}

fn output(repl: &Repl<Vec<u8>>) -> String {
    String::from_utf8_lossy(repl.output()).into_owned()
}

#[tokio::test]
async fn play_and_status() {
    let (mut repl, handle) = setup().await;

    assert_eq!(repl.handle_line("play 2").await.unwrap(), Flow::Continue);
    repl.handle_line("status").await.unwrap();

    let text = output(&repl);
    assert!(text.contains("Now playing: Track b - Artist (single)"));
    assert!(text.contains("Playing: Track b - Artist"));
    assert!(text.contains("0:00 / 2:00"));

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.current_track.unwrap().id.as_str(), "b");
    assert!(snapshot.is_playing);
}

#[tokio::test]
async fn playlist_then_next_stays_in_order() {
    let (mut repl, handle) = setup().await;

    repl.handle_line("playlists").await.unwrap();
    repl.handle_line("playlist mix").await.unwrap();
    repl.handle_line("queue").await.unwrap();
    repl.handle_line("next").await.unwrap();

    let text = output(&repl);
    assert!(text.contains("Evening mix"));
    assert!(text.contains("Now playing: Track c - Artist (playlist)"));
    assert!(text.contains("Up next (playlist):"));

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.current_track.unwrap().id.as_str(), "a");
    assert_eq!(snapshot.context, ContextKind::Playlist);
    assert_eq!(snapshot.current_index, Some(1));
}

#[tokio::test]
async fn tick_past_the_end_advances() {
    let (mut repl, handle) = setup().await;

    repl.handle_line("playlist mix").await.unwrap();
    repl.handle_line("tick 30").await.unwrap();
    assert!(output(&repl).contains("At 0:30 / 2:00"));

    repl.handle_line("tick 200").await.unwrap();
    assert_eq!(
        handle.snapshot().current_track.unwrap().id.as_str(),
        "a"
    );
}

#[tokio::test]
async fn search_then_play_result() {
    let (mut repl, handle) = setup().await;

    repl.handle_line("search Track c").await.unwrap();
    repl.handle_line("result 1").await.unwrap();

    let text = output(&repl);
    assert!(text.contains("  1. Track c - Artist  [2:00]"));

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.context, ContextKind::SearchResults);
    assert_eq!(snapshot.current_track.unwrap().id.as_str(), "c");
}

#[tokio::test]
async fn like_toggles_current_track() {
    let (mut repl, handle) = setup().await;

    repl.handle_line("play 1").await.unwrap();
    repl.handle_line("like").await.unwrap();
    assert!(handle.snapshot().current_liked);

    repl.handle_line("like").await.unwrap();
    assert!(!handle.snapshot().current_liked);

    let text = output(&repl);
    assert!(text.contains("Liked Track a"));
    assert!(text.contains("Removed like from Track a"));
}

#[tokio::test]
async fn failures_are_reported_and_prompt_continues() {
    let (mut repl, _handle) = setup().await;

    assert_eq!(repl.handle_line("play 9").await.unwrap(), Flow::Continue);
    assert_eq!(repl.handle_line("dance").await.unwrap(), Flow::Continue);
    assert_eq!(repl.handle_line("seek 10").await.unwrap(), Flow::Continue);
    assert_eq!(repl.handle_line("playlist nope").await.unwrap(), Flow::Continue);
    assert_eq!(repl.handle_line("").await.unwrap(), Flow::Continue);

    let text = output(&repl);
    assert!(text.contains("Unknown command: dance"));
    assert_eq!(text.matches("Error:").count(), 3);
}

#[tokio::test]
async fn run_reads_until_quit() {
    let (mut repl, handle) = setup().await;

    let input = "play 1\nshuffle\nrepeat\nquit\nnext\n".as_bytes();
    repl.run(input).await.unwrap();

    let snapshot = handle.snapshot();
    assert!(snapshot.shuffle_enabled);
    assert!(snapshot.repeat_enabled);
    // "next" after quit never ran
    assert_eq!(snapshot.current_track.unwrap().id.as_str(), "a");
    assert!(output(&repl).contains("Shuffle on"));
}

#[tokio::test]
async fn closed_player_stops_the_prompt() {
    let (mut repl, handle) = setup().await;
    handle.shutdown().await.unwrap();

    assert!(repl.handle_line("next").await.is_err());
}

#[tokio::test]
async fn playlist_lifecycle() {
    let (mut repl, _handle, state, _) = setup_with_state().await;

    repl.handle_line("playlist-new Road trip").await.unwrap();
    assert!(output(&repl).contains("Created playlist 101: Road trip"));

    repl.handle_line("playlist-add 101 2").await.unwrap();
    repl.handle_line("playlist-add 101 3").await.unwrap();
    assert_eq!(state.playlist_ids("101").unwrap(), vec!["b", "c"]);

    repl.handle_line("playlist-remove 101 1").await.unwrap();
    assert_eq!(state.playlist_ids("101").unwrap(), vec!["c"]);

    repl.handle_line("playlist-delete 101").await.unwrap();
    assert!(state.playlist("101").is_none());

    let text = output(&repl);
    assert!(text.contains("Added Track b to playlist 101"));
    assert!(text.contains("Removed Track b from playlist 101"));
    assert!(text.contains("Deleted playlist 101"));
}

#[tokio::test]
async fn rename_keeps_cover() {
    let (mut repl, _handle, state, _) = setup_with_state().await;
    state
        .playlists
        .lock()
        .unwrap()
        .get_mut("mix")
        .unwrap()
        .0
        .image_url = Some("/uploads/images/mix.jpg".to_string());

    repl.handle_line("playlist-rename mix Late night").await.unwrap();

    let playlist = state.playlist("mix").unwrap();
    assert_eq!(playlist.name, "Late night");
    assert_eq!(playlist.image_url.as_deref(), Some("/uploads/images/mix.jpg"));
    assert!(output(&repl).contains("Renamed playlist mix to Late night"));
}

#[tokio::test]
async fn playlist_edits_report_bad_targets() {
    let (mut repl, _handle, state, _) = setup_with_state().await;

    repl.handle_line("playlist-rename nope New").await.unwrap();
    repl.handle_line("playlist-remove mix 9").await.unwrap();
    repl.handle_line("playlist-add mix 9").await.unwrap();

    assert_eq!(output(&repl).matches("Error:").count(), 3);
    assert_eq!(state.playlist_ids("mix").unwrap(), vec!["c", "a"]);
}

#[tokio::test]
async fn register_and_login() {
    let (mut repl, _handle, _, accounts) = setup_with_state().await;

    repl.handle_line("register new@example.com password123 New Listener")
        .await
        .unwrap();
    assert!(output(&repl).contains("Welcome, New Listener"));
    assert_eq!(
        accounts.signed_in.lock().unwrap().as_deref(),
        Some("new@example.com")
    );

    repl.handle_line("register taken@example.com password123 Someone")
        .await
        .unwrap();
    repl.handle_line("login me@example.com wrong").await.unwrap();
    repl.handle_line("login me@example.com password123").await.unwrap();

    let text = output(&repl);
    assert!(text.contains("Email already registered."));
    assert!(text.contains("Invalid credentials"));
    assert!(text.contains("Signed in as Me"));
}

#[tokio::test]
async fn account_commands_need_an_account_service() {
    let (repl, handle, state, _) = setup_with_state().await;
    drop(repl);
    let api: Arc<dyn MusicApi> = state;
    let mut repl = Repl::new(handle, api, Vec::new());

    repl.handle_line("login me@example.com password123").await.unwrap();
    assert!(output(&repl).contains("Error: Account commands are not available"));
}
