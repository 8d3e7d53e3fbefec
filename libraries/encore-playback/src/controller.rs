//! Serialized player controller
//!
//! A single task owns the [`Player`]. Commands arrive over an `mpsc` channel
//! and are applied strictly in order, so rapid repeated requests can never
//! interleave. After every command the task publishes a fresh snapshot on a
//! `watch` channel and forwards the drained events on a `broadcast` channel.

use crate::context::PlaybackContext;
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::player::{Player, PlayerSnapshot};
use crate::types::PlayerSettings;
use encore_core::{PlaylistId, Track};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

type Reply<T> = oneshot::Sender<T>;

enum Command {
    Hydrate {
        reply: Reply<Result<()>>,
    },
    Play {
        track: Track,
        context: PlaybackContext,
        index: Option<usize>,
        reply: Reply<()>,
    },
    PlayFromCatalog {
        index: usize,
        reply: Reply<Result<()>>,
    },
    PlayLiked {
        index: usize,
        reply: Reply<Result<()>>,
    },
    PlaySearchResult {
        index: usize,
        reply: Reply<Result<()>>,
    },
    OpenPlaylist {
        playlist_id: PlaylistId,
        index: usize,
        reply: Reply<Result<()>>,
    },
    Search {
        query: String,
        reply: Reply<Result<Vec<Track>>>,
    },
    Next {
        reply: Reply<bool>,
    },
    Previous {
        reply: Reply<bool>,
    },
    TrackEnded {
        reply: Reply<bool>,
    },
    ToggleShuffle {
        reply: Reply<bool>,
    },
    ToggleRepeat {
        reply: Reply<bool>,
    },
    Seek {
        seconds: f64,
        reply: Reply<Result<()>>,
    },
    SetPosition {
        seconds: f64,
    },
    Pause,
    Resume,
    ToggleLike {
        track: Option<Track>,
        reply: Reply<Result<bool>>,
    },
    ApplySettings(PlayerSettings),
    Query(Box<dyn FnOnce(&Player) + Send>),
    Shutdown {
        reply: Reply<Player>,
    },
}

/// Spawns the task that owns a [`Player`]
pub struct PlayerController;

impl PlayerController {
    /// Move `player` into a new task and return a handle to drive it
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(player: Player) -> PlayerHandle {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(player.snapshot());
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);

        tokio::spawn(run(player, commands_rx, snapshot_tx, events_tx.clone()));
        debug!("Player controller started");

        PlayerHandle {
            commands: commands_tx,
            snapshot: snapshot_rx,
            events: events_tx,
        }
    }
}

/// Cloneable handle to a running player task
///
/// Every method fails with [`PlaybackError::ControllerClosed`] once the task
/// has stopped.
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<PlayerSnapshot>,
    events: broadcast::Sender<PlayerEvent>,
}

impl PlayerHandle {
    /// Latest published snapshot
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified on every published snapshot
    pub fn watch(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshot.clone()
    }

    /// Subscribe to player events
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    /// Fetch the catalog and the liked set
    pub async fn hydrate(&self) -> Result<()> {
        self.request(|reply| Command::Hydrate { reply }).await?
    }

    /// Play `track` within `context`
    pub async fn play(
        &self,
        track: Track,
        context: PlaybackContext,
        index: Option<usize>,
    ) -> Result<()> {
        self.request(|reply| Command::Play {
            track,
            context,
            index,
            reply,
        })
        .await
    }

    /// Play a catalog track on its own
    pub async fn play_from_catalog(&self, index: usize) -> Result<()> {
        self.request(|reply| Command::PlayFromCatalog { index, reply })
            .await?
    }

    /// Play the liked set from `index`
    pub async fn play_liked(&self, index: usize) -> Result<()> {
        self.request(|reply| Command::PlayLiked { index, reply }).await?
    }

    /// Play the search results from `index`
    pub async fn play_search_result(&self, index: usize) -> Result<()> {
        self.request(|reply| Command::PlaySearchResult { index, reply })
            .await?
    }

    /// Fetch a playlist and play it from `index`
    pub async fn open_playlist(&self, playlist_id: PlaylistId, index: usize) -> Result<()> {
        self.request(|reply| Command::OpenPlaylist {
            playlist_id,
            index,
            reply,
        })
        .await?
    }

    /// Search the catalog, keeping the results for `play_search_result`
    pub async fn search(&self, query: impl Into<String>) -> Result<Vec<Track>> {
        let query = query.into();
        self.request(|reply| Command::Search { query, reply })
            .await?
    }

    /// Skip forward; `false` when nothing can follow
    pub async fn next(&self) -> Result<bool> {
        self.request(|reply| Command::Next { reply }).await
    }

    /// Previous button
    pub async fn previous(&self) -> Result<bool> {
        self.request(|reply| Command::Previous { reply }).await
    }

    /// Report that the media reached the end of the track
    pub async fn track_ended(&self) -> Result<bool> {
        self.request(|reply| Command::TrackEnded { reply }).await
    }

    /// Flip shuffle, returning the new flag
    pub async fn toggle_shuffle(&self) -> Result<bool> {
        self.request(|reply| Command::ToggleShuffle { reply }).await
    }

    /// Flip repeat, returning the new flag
    pub async fn toggle_repeat(&self) -> Result<bool> {
        self.request(|reply| Command::ToggleRepeat { reply }).await
    }

    /// Jump to `seconds` in the current track
    pub async fn seek(&self, seconds: f64) -> Result<()> {
        self.request(|reply| Command::Seek { seconds, reply })
            .await?
    }

    /// Media position update
    pub async fn set_position(&self, seconds: f64) -> Result<()> {
        self.send(Command::SetPosition { seconds }).await
    }

    /// Pause the media
    pub async fn pause(&self) -> Result<()> {
        self.send(Command::Pause).await
    }

    /// Resume the media
    pub async fn resume(&self) -> Result<()> {
        self.send(Command::Resume).await
    }

    /// Flip the liked state of `track`, returning the new state
    pub async fn toggle_like(&self, track: Track) -> Result<bool> {
        self.request(|reply| Command::ToggleLike {
            track: Some(track),
            reply,
        })
        .await?
    }

    /// Flip the liked state of the current track
    pub async fn toggle_like_current(&self) -> Result<bool> {
        self.request(|reply| Command::ToggleLike { track: None, reply })
            .await?
    }

    /// Restore persisted flags
    pub async fn apply_settings(&self, settings: PlayerSettings) -> Result<()> {
        self.send(Command::ApplySettings(settings)).await
    }

    /// Run a read-only closure against the player, in command order
    pub async fn query<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Player) -> T + Send + 'static,
    {
        self.request(|reply| {
            Command::Query(Box::new(move |player| {
                let _ = reply.send(f(player));
            }))
        })
        .await
    }

    /// Stop the task and take the player back
    pub async fn shutdown(&self) -> Result<Player> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| PlaybackError::ControllerClosed)
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.send(build(reply)).await?;
        response.await.map_err(|_| PlaybackError::ControllerClosed)
    }
}

async fn run(
    mut player: Player,
    mut commands: mpsc::Receiver<Command>,
    snapshot: watch::Sender<PlayerSnapshot>,
    events: broadcast::Sender<PlayerEvent>,
) {
    while let Some(command) = commands.recv().await {
        if let Command::Shutdown { reply } = command {
            publish(&mut player, &snapshot, &events);
            info!("Player controller shut down");
            let _ = reply.send(player);
            return;
        }

        // Reply after publishing: a completed command is visible in the snapshot
        let responder = apply(&mut player, command).await;
        publish(&mut player, &snapshot, &events);
        if let Some(respond) = responder {
            respond();
        }
    }

    debug!("All player handles dropped, controller stopping");
}

type Responder = Box<dyn FnOnce() + Send>;

fn respond<T: Send + 'static>(reply: Reply<T>, value: T) -> Option<Responder> {
    Some(Box::new(move || {
        let _ = reply.send(value);
    }))
}

async fn apply(player: &mut Player, command: Command) -> Option<Responder> {
    match command {
        Command::Hydrate { reply } => respond(reply, player.hydrate().await),
        Command::Play {
            track,
            context,
            index,
            reply,
        } => {
            player.play(track, context, index);
            respond(reply, ())
        }
        Command::PlayFromCatalog { index, reply } => {
            respond(reply, player.play_from_catalog(index))
        }
        Command::PlayLiked { index, reply } => respond(reply, player.play_liked(index)),
        Command::PlaySearchResult { index, reply } => {
            respond(reply, player.play_search_result(index))
        }
        Command::OpenPlaylist {
            playlist_id,
            index,
            reply,
        } => {
            let result = player.open_playlist(&playlist_id, index).await;
            if let Err(e) = &result {
                warn!(playlist_id = %playlist_id, error = %e, "Failed to open playlist");
            }
            respond(reply, result)
        }
        Command::Search { query, reply } => {
            let result = player.search(&query).await.map(<[Track]>::to_vec);
            respond(reply, result)
        }
        Command::Next { reply } => respond(reply, player.next()),
        Command::Previous { reply } => respond(reply, player.previous()),
        Command::TrackEnded { reply } => respond(reply, player.track_ended()),
        Command::ToggleShuffle { reply } => respond(reply, player.toggle_shuffle()),
        Command::ToggleRepeat { reply } => respond(reply, player.toggle_repeat()),
        Command::Seek { seconds, reply } => respond(reply, player.seek(seconds)),
        Command::SetPosition { seconds } => {
            player.set_position(seconds);
            None
        }
        Command::Pause => {
            player.pause();
            None
        }
        Command::Resume => {
            player.resume();
            None
        }
        Command::ToggleLike { track, reply } => {
            let result = match track {
                Some(track) => Ok(player.toggle_like(&track)),
                None => player.toggle_like_current(),
            };
            respond(reply, result)
        }
        Command::ApplySettings(settings) => {
            player.apply_settings(settings);
            None
        }
        Command::Query(f) => {
            f(player);
            None
        }
        // Consumed by the run loop
        Command::Shutdown { .. } => None,
    }
}

fn publish(
    player: &mut Player,
    snapshot: &watch::Sender<PlayerSnapshot>,
    events: &broadcast::Sender<PlayerEvent>,
) {
    for event in player.drain_events() {
        // No subscribers is fine
        let _ = events.send(event);
    }
    snapshot.send_replace(player.snapshot());
}
