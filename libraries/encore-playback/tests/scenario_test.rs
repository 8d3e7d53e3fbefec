//! Playback scenario tests
//!
//! Drive a `Player` through realistic listening sessions against an
//! in-memory music service.

mod common;

use common::{as_api, create_test_track, create_test_tracks, ApiCall, FakeApi};
use encore_core::{EncoreError, PlaylistId, TrackId};
use encore_playback::{
    ContextKind, PlaybackConfig, PlaybackContext, PlaybackError, Player, PlayerEvent,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::timeout;

// ===== Test Helpers =====

async fn hydrated_player(api: FakeApi) -> Player {
    let mut player = Player::with_rng(
        PlaybackConfig::default(),
        as_api(api),
        StdRng::seed_from_u64(42),
    );
    player.hydrate().await.unwrap();
    player
}

async fn next_call(rx: &mut UnboundedReceiver<ApiCall>) -> ApiCall {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("remote call not observed in time")
        .expect("call channel closed")
}

fn current_id(player: &Player) -> String {
    player.current_track().unwrap().id.to_string()
}

// ===== Context Advancement =====

#[tokio::test]
async fn playlist_plays_through_then_falls_back_to_catalog() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(
        catalog[0].clone(),
        PlaybackContext::playlist(catalog.clone()),
        Some(0),
    );

    assert!(player.next());
    assert_eq!(current_id(&player), "B");
    assert_eq!(player.session().current_index(), Some(1));

    assert!(player.next());
    assert_eq!(current_id(&player), "C");
    assert_eq!(player.session().current_index(), Some(2));

    // End of playlist without repeat: random catalog track, context dropped
    assert!(player.next());
    let id = current_id(&player);
    assert!(id == "A" || id == "B", "unexpected fallback track {}", id);
    assert_eq!(player.session().context().kind(), ContextKind::None);
    assert_eq!(player.session().current_index(), None);
    assert!(player.queue_preview().is_empty());
}

#[tokio::test]
async fn repeat_wraps_to_start_of_playlist() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(
        catalog[2].clone(),
        PlaybackContext::playlist(catalog.clone()),
        Some(2),
    );
    player.toggle_repeat();

    assert!(player.next());
    assert_eq!(current_id(&player), "A");
    assert_eq!(player.session().current_index(), Some(0));
    assert_eq!(player.session().context().kind(), ContextKind::Playlist);
}

#[tokio::test]
async fn queue_preview_lists_remaining_context() {
    let catalog = create_test_tracks(&["A", "B", "C", "D"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(
        catalog[1].clone(),
        PlaybackContext::playlist(catalog.clone()),
        Some(1),
    );

    let preview: Vec<_> = player
        .queue_preview()
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(preview, vec!["C", "D"]);
}

#[tokio::test]
async fn index_is_looked_up_when_missing() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(
        catalog[1].clone(),
        PlaybackContext::playlist(catalog.clone()),
        None,
    );
    assert_eq!(player.session().current_index(), Some(1));

    // Out-of-range index falls back to the lookup as well
    player.play(
        catalog[2].clone(),
        PlaybackContext::playlist(catalog.clone()),
        Some(99),
    );
    assert_eq!(player.session().current_index(), Some(2));
}

#[tokio::test]
async fn shuffle_picks_other_playlist_track() {
    let catalog = create_test_tracks(&["A", "B", "C", "D", "E"]);
    let playlist = create_test_tracks(&["B", "C", "D"]);
    let (api, _rx) = FakeApi::new(catalog);
    let mut player = hydrated_player(api).await;

    player.play(
        playlist[0].clone(),
        PlaybackContext::playlist(playlist.clone()),
        Some(0),
    );
    player.toggle_shuffle();

    for _ in 0..20 {
        let before = current_id(&player);
        assert!(player.next());
        let after = current_id(&player);

        assert_ne!(before, after);
        assert!(["B", "C", "D"].contains(&after.as_str()));
        assert_eq!(player.session().context().kind(), ContextKind::Playlist);

        let index = player.session().current_index().unwrap();
        assert_eq!(playlist[index].id.as_str(), after);
    }
}

#[tokio::test]
async fn shuffle_does_not_apply_to_liked_set() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api.with_liked(catalog)).await;

    player.toggle_shuffle();
    player.play_liked(0).unwrap();

    assert!(player.next());
    assert_eq!(current_id(&player), "B");
    assert!(player.next());
    assert_eq!(current_id(&player), "C");
}

// ===== Previous =====

#[tokio::test]
async fn previous_past_threshold_only_restarts() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(
        catalog[1].clone(),
        PlaybackContext::playlist(catalog.clone()),
        Some(1),
    );
    player.set_position(42.5);
    player.drain_events();

    assert!(player.previous());

    assert_eq!(current_id(&player), "B");
    assert_eq!(player.session().current_index(), Some(1));
    assert!(player.current_time_seconds().abs() < f64::EPSILON);
    assert_eq!(
        player.drain_events(),
        vec![PlayerEvent::Restarted {
            track_id: TrackId::new("B")
        }]
    );
}

#[tokio::test]
async fn previous_steps_back_in_context() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(
        catalog[2].clone(),
        PlaybackContext::playlist(catalog.clone()),
        Some(2),
    );
    player.set_position(2.0);

    assert!(player.previous());
    assert_eq!(current_id(&player), "B");
    assert_eq!(player.session().current_index(), Some(1));
}

#[tokio::test]
async fn previous_without_context_uses_history() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(catalog[0].clone(), PlaybackContext::None, None);
    player.play(catalog[1].clone(), PlaybackContext::None, None);

    let history: Vec<_> = player.history().iter().map(|t| t.id.to_string()).collect();
    assert_eq!(history, vec!["B", "A"]);

    assert!(player.previous());
    assert_eq!(current_id(&player), "A");
    assert_eq!(player.session().context().kind(), ContextKind::None);
    assert_eq!(player.session().current_index(), None);
}

#[tokio::test]
async fn history_jump_discards_context() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(catalog[2].clone(), PlaybackContext::None, None);
    player.play(
        catalog[0].clone(),
        PlaybackContext::playlist(catalog.clone()),
        Some(0),
    );

    // Index 0 cannot step back; the previous history entry wins
    assert!(player.previous());
    assert_eq!(current_id(&player), "C");
    assert_eq!(player.session().context().kind(), ContextKind::None);
}

// ===== Dead Ends =====

#[tokio::test]
async fn empty_catalog_next_is_noop() {
    let (api, _rx) = FakeApi::new(Vec::new());
    let mut player = hydrated_player(api).await;

    assert!(!player.next());
    assert!(player.current_track().is_none());
    assert!(player.history().is_empty());
    assert!(!player.has_pending_events());
}

#[tokio::test]
async fn track_end_with_nothing_to_follow_leaves_state_alone() {
    let catalog = create_test_tracks(&["A"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(catalog[0].clone(), PlaybackContext::None, None);
    player.drain_events();
    let playing_before = player.is_playing();

    assert!(!player.track_ended());

    assert_eq!(current_id(&player), "A");
    assert_eq!(player.is_playing(), playing_before);
    assert!(!player.has_pending_events());

    player.pause();
    player.drain_events();
    assert!(!player.track_ended());
    assert!(!player.is_playing());
    assert!(!player.has_pending_events());
}

#[tokio::test]
async fn repeat_without_context_loops_track() {
    let catalog = create_test_tracks(&["A", "B"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(catalog[0].clone(), PlaybackContext::None, None);
    player.toggle_repeat();
    player.set_position(180.0);
    player.pause();

    assert!(player.track_ended());
    assert_eq!(current_id(&player), "A");
    assert!(player.is_playing());
    assert!(player.current_time_seconds().abs() < f64::EPSILON);
}

// ===== History =====

#[tokio::test]
async fn history_is_bounded_and_deduplicated() {
    let ids: Vec<String> = (0..60).map(|i| i.to_string()).collect();
    let catalog: Vec<_> = ids.iter().map(|id| create_test_track(id)).collect();
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    for track in &catalog {
        player.play(track.clone(), PlaybackContext::None, None);
    }
    assert_eq!(player.history().len(), 50);
    assert_eq!(player.history().most_recent().unwrap().id.as_str(), "59");

    // Replaying an entry moves it to the front without growing the list
    player.play(catalog[30].clone(), PlaybackContext::None, None);
    assert_eq!(player.history().len(), 50);
    assert_eq!(player.history().most_recent().unwrap().id.as_str(), "30");
    assert_eq!(
        player
            .history()
            .iter()
            .filter(|t| t.id.as_str() == "30")
            .count(),
        1
    );
}

// ===== Remote Side Effects =====

#[tokio::test]
async fn track_changes_are_reported_as_recently_played() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let (api, mut rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api).await;

    player.play(
        catalog[0].clone(),
        PlaybackContext::playlist(catalog.clone()),
        Some(0),
    );
    assert_eq!(next_call(&mut rx).await, ApiCall::RecentlyPlayed("A".into()));

    player.next();
    assert_eq!(next_call(&mut rx).await, ApiCall::RecentlyPlayed("B".into()));
}

#[tokio::test]
async fn double_like_toggle_restores_state() {
    let catalog = create_test_tracks(&["A", "B"]);
    let (api, mut rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api.with_liked(vec![catalog[0].clone()])).await;
    let track = catalog[0].clone();

    assert!(player.is_liked(&track));
    assert!(!player.toggle_like(&track));
    assert!(player.toggle_like(&track));
    assert!(player.is_liked(&track));

    assert_eq!(next_call(&mut rx).await, ApiCall::Unlike("A".into()));
    assert_eq!(next_call(&mut rx).await, ApiCall::Like("A".into()));
}

#[tokio::test]
async fn failed_like_is_not_rolled_back() {
    let catalog = create_test_tracks(&["A"]);
    let (api, mut rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api.failing_mutations()).await;

    assert!(player.toggle_like(&catalog[0]));
    assert_eq!(next_call(&mut rx).await, ApiCall::Like("A".into()));

    // Give the detached task time to observe the failure
    tokio::task::yield_now().await;
    assert!(player.is_liked(&catalog[0]));
    assert_eq!(player.liked_tracks().len(), 1);
}

#[tokio::test]
async fn liked_set_is_not_rehydrated() {
    let catalog = create_test_tracks(&["A", "B"]);
    let (api, _rx) = FakeApi::new(catalog.clone());
    let mut player = hydrated_player(api.with_liked(vec![catalog[0].clone()])).await;

    player.toggle_like(&catalog[0]);
    player.hydrate().await.unwrap();

    assert!(!player.is_liked(&catalog[0]));
}

// ===== Remote Contexts =====

#[tokio::test]
async fn open_playlist_plays_fetched_tracks() {
    let catalog = create_test_tracks(&["A", "B", "C"]);
    let playlist = create_test_tracks(&["C", "A"]);
    let (api, _rx) = FakeApi::new(catalog);
    let mut player = hydrated_player(api.with_playlist("7", playlist)).await;

    player
        .open_playlist(&PlaylistId::new("7"), 0)
        .await
        .unwrap();

    assert_eq!(current_id(&player), "C");
    assert_eq!(player.session().context().kind(), ContextKind::Playlist);
    assert_eq!(player.queue_preview().len(), 1);
}

#[tokio::test]
async fn open_unknown_playlist_fails_without_state_change() {
    let (api, _rx) = FakeApi::new(create_test_tracks(&["A"]));
    let mut player = hydrated_player(api).await;

    let err = player
        .open_playlist(&PlaylistId::new("missing"), 0)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PlaybackError::Api(EncoreError::NotFound { .. })
    ));
    assert!(player.current_track().is_none());
}

#[tokio::test]
async fn search_results_become_context() {
    let catalog = vec![
        create_test_track("A"),
        common::create_test_track("B").with_album("Other"),
        encore_core::Track::new("C", "Moonlight", "Someone"),
    ];
    let (api, _rx) = FakeApi::new(catalog);
    let mut player = hydrated_player(api).await;

    let results = player.search("track").await.unwrap().to_vec();
    assert_eq!(results.len(), 2);

    player.play_search_result(1).unwrap();
    assert_eq!(current_id(&player), "B");
    assert_eq!(player.session().context().kind(), ContextKind::SearchResults);
    assert_eq!(player.session().current_index(), Some(1));
}
