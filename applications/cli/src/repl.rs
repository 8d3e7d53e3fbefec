//! Interactive prompt driving a running player

use crate::commands::{Command, CommandError, Password, HELP};
use crate::error::{CliError, Result};
use encore_core::{AccountApi, MusicApi, Playlist, PlaylistDraft, PlaylistId, Registration, Track};
use encore_playback::{ContextKind, PlaybackError, PlayerHandle, PlayerSnapshot};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

/// Whether the prompt keeps reading lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Executes prompt commands and renders results to `out`
pub struct Repl<W: Write> {
    player: PlayerHandle,
    api: Arc<dyn MusicApi>,
    accounts: Option<Arc<dyn AccountApi>>,
    out: W,
}

impl<W: Write> Repl<W> {
    pub fn new(player: PlayerHandle, api: Arc<dyn MusicApi>, out: W) -> Self {
        Self {
            player,
            api,
            accounts: None,
            out,
        }
    }

    /// Enable `register` and `login`
    pub fn with_accounts(mut self, accounts: Arc<dyn AccountApi>) -> Self {
        self.accounts = Some(accounts);
        self
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Parse and run one input line
    ///
    /// Bad input and failed commands are reported on the output and the
    /// prompt continues. Only a closed player or a broken output stops it.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(self.out, "{}", e)?;
                return Ok(Flow::Continue);
            }
        };

        debug!(command = ?command, "Executing command");
        match self.execute(command).await {
            Ok(flow) => Ok(flow),
            Err(e @ (CliError::Io(_) | CliError::Playback(PlaybackError::ControllerClosed))) => {
                Err(e)
            }
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
                Ok(Flow::Continue)
            }
        }
    }

    /// Read lines until `quit` or end of input
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(self.out)?;
                info!("End of input");
                return Ok(());
            };

            if self.handle_line(&line).await? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Run a parsed command
    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Status => {
                let snapshot = self.player.snapshot();
                self.print_status(&snapshot)?;
            }
            Command::Queue => {
                let snapshot = self.player.snapshot();
                if snapshot.queue_preview.is_empty() {
                    writeln!(self.out, "Nothing queued")?;
                } else {
                    writeln!(self.out, "Up next ({}):", context_label(snapshot.context))?;
                    self.print_tracks(&snapshot.queue_preview)?;
                }
            }
            Command::History => {
                let history = self.player.snapshot().history;
                if history.is_empty() {
                    writeln!(self.out, "No history yet")?;
                } else {
                    self.print_tracks(&history)?;
                }
            }
            Command::Catalog => {
                let catalog = self.player.query(|p| p.catalog().to_vec()).await?;
                self.print_list("No songs", &catalog)?;
            }
            Command::Play(index) => {
                self.player.play_from_catalog(index).await?;
                self.print_now_playing()?;
            }
            Command::Liked(None) => {
                let liked = self.player.query(|p| p.liked_tracks().to_vec()).await?;
                self.print_list("No liked songs", &liked)?;
            }
            Command::Liked(Some(index)) => {
                self.player.play_liked(index).await?;
                self.print_now_playing()?;
            }
            Command::Playlists => {
                let playlists = self.api.fetch_playlists().await?;
                self.print_playlists(&playlists)?;
            }
            Command::Playlist { id, index } => {
                self.player.open_playlist(PlaylistId::new(id), index).await?;
                self.print_now_playing()?;
            }
            Command::PlaylistNew(name) => {
                let playlist = self.api.create_playlist(&PlaylistDraft::new(name)).await?;
                writeln!(self.out, "Created playlist {}: {}", playlist.id, playlist.name)?;
            }
            Command::PlaylistRename { id, name } => {
                let playlist_id = PlaylistId::new(id);
                let existing = self.find_playlist(&playlist_id).await?;
                let draft = PlaylistDraft::renaming(&existing, name);
                let playlist = self.api.update_playlist(&playlist_id, &draft).await?;
                writeln!(self.out, "Renamed playlist {} to {}", playlist.id, playlist.name)?;
            }
            Command::PlaylistDelete(id) => {
                let playlist_id = PlaylistId::new(id);
                self.api.delete_playlist(&playlist_id).await?;
                writeln!(self.out, "Deleted playlist {}", playlist_id)?;
            }
            Command::PlaylistAdd { id, index } => {
                let track = self
                    .player
                    .query(move |p| p.catalog().get(index).cloned())
                    .await?
                    .ok_or(PlaybackError::IndexOutOfBounds(index))?;
                let playlist_id = PlaylistId::new(id);
                self.api.add_to_playlist(&playlist_id, &track.id).await?;
                writeln!(self.out, "Added {} to playlist {}", track.title, playlist_id)?;
            }
            Command::PlaylistRemove { id, index } => {
                let playlist_id = PlaylistId::new(id);
                let tracks = self.api.fetch_playlist(&playlist_id).await?;
                let track = tracks
                    .get(index)
                    .ok_or(PlaybackError::IndexOutOfBounds(index))?;
                self.api.remove_from_playlist(&playlist_id, &track.id).await?;
                writeln!(self.out, "Removed {} from playlist {}", track.title, playlist_id)?;
            }
            Command::Search(query) => {
                let results = self.player.search(query).await?;
                self.print_list("No results", &results)?;
            }
            Command::Result(index) => {
                self.player.play_search_result(index).await?;
                self.print_now_playing()?;
            }
            Command::Next => {
                if self.player.next().await? {
                    self.print_now_playing()?;
                } else {
                    writeln!(self.out, "Nothing to play next")?;
                }
            }
            Command::Prev => {
                if self.player.previous().await? {
                    self.print_now_playing()?;
                } else {
                    writeln!(self.out, "Nothing to go back to")?;
                }
            }
            Command::Ended => self.finish_track().await?,
            Command::Tick(seconds) => self.tick(seconds).await?,
            Command::Seek(seconds) => {
                self.player.seek(seconds).await?;
                let snapshot = self.player.snapshot();
                writeln!(
                    self.out,
                    "At {}",
                    format_position(snapshot.current_time_seconds, snapshot.duration_seconds)
                )?;
            }
            Command::Pause => {
                self.player.pause().await?;
                writeln!(self.out, "Paused")?;
            }
            Command::Resume => {
                self.player.resume().await?;
                writeln!(self.out, "Playing")?;
            }
            Command::Shuffle => {
                let enabled = self.player.toggle_shuffle().await?;
                writeln!(self.out, "Shuffle {}", on_off(enabled))?;
            }
            Command::Repeat => {
                let enabled = self.player.toggle_repeat().await?;
                writeln!(self.out, "Repeat {}", on_off(enabled))?;
            }
            Command::Like(target) => self.like(target).await?,
            Command::Recent => {
                let recent = self.api.fetch_recently_played().await?;
                self.print_list("Nothing played recently", &recent)?;
            }
            Command::Register {
                email,
                password,
                name,
            } => self.register(Registration::new(email, password.expose(), name)).await?,
            Command::Login { email, password } => self.login(&email, &password).await?,
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Advance the playback clock, ending the track when it runs out
    async fn tick(&mut self, seconds: f64) -> Result<()> {
        let snapshot = self.player.snapshot();
        if snapshot.current_track.is_none() {
            writeln!(self.out, "Nothing is playing")?;
            return Ok(());
        }

        let position = (snapshot.current_time_seconds + seconds).max(0.0);
        let duration = f64::from(snapshot.duration_seconds);
        if snapshot.duration_seconds > 0 && position >= duration {
            return self.finish_track().await;
        }

        self.player.set_position(position).await?;
        let position = self.player.query(|p| p.current_time_seconds()).await?;
        writeln!(
            self.out,
            "At {}",
            format_position(position, snapshot.duration_seconds)
        )?;
        Ok(())
    }

    async fn register(&mut self, registration: Registration) -> Result<()> {
        let accounts = self.accounts()?;
        let account = accounts.register(&registration).await?;
        writeln!(
            self.out,
            "Welcome, {}",
            account.name.as_deref().unwrap_or(&registration.email)
        )?;
        self.reload_library().await
    }

    async fn login(&mut self, email: &str, password: &Password) -> Result<()> {
        let accounts = self.accounts()?;
        let account = accounts.login(email, password.expose()).await?;
        writeln!(
            self.out,
            "Signed in as {}",
            account.name.as_deref().unwrap_or(email)
        )?;
        self.reload_library().await
    }

    fn accounts(&self) -> Result<Arc<dyn AccountApi>> {
        self.accounts
            .clone()
            .ok_or(CliError::Unavailable("Account commands"))
    }

    /// Refetch the catalog, and the liked set if it was not loaded yet
    async fn reload_library(&mut self) -> Result<()> {
        if let Err(e) = self.player.hydrate().await {
            writeln!(self.out, "Could not reload the library: {}", e)?;
        }
        Ok(())
    }

    async fn find_playlist(&self, playlist_id: &PlaylistId) -> Result<Playlist> {
        self.api
            .fetch_playlists()
            .await?
            .into_iter()
            .find(|p| p.id == *playlist_id)
            .ok_or_else(|| encore_core::EncoreError::not_found("Playlist", playlist_id.as_str()).into())
    }

    async fn finish_track(&mut self) -> Result<()> {
        if self.player.track_ended().await? {
            self.print_now_playing()?;
        } else {
            writeln!(self.out, "Nothing follows this track")?;
        }
        Ok(())
    }

    async fn like(&mut self, target: Option<usize>) -> Result<()> {
        let (title, liked) = match target {
            None => {
                let liked = self.player.toggle_like_current().await?;
                let title = self
                    .player
                    .snapshot()
                    .current_track
                    .map(|t| t.title)
                    .unwrap_or_default();
                (title, liked)
            }
            Some(index) => {
                let track = self
                    .player
                    .query(move |p| p.catalog().get(index).cloned())
                    .await?
                    .ok_or(PlaybackError::IndexOutOfBounds(index))?;
                let title = track.title.clone();
                (title, self.player.toggle_like(track).await?)
            }
        };

        let verb = if liked { "Liked" } else { "Removed like from" };
        writeln!(self.out, "{} {}", verb, title)?;
        Ok(())
    }

    fn print_now_playing(&mut self) -> Result<()> {
        let snapshot = self.player.snapshot();
        match &snapshot.current_track {
            Some(track) => writeln!(
                self.out,
                "Now playing: {} ({})",
                describe(track),
                context_label(snapshot.context)
            )?,
            None => writeln!(self.out, "Nothing is playing")?,
        }
        Ok(())
    }

    fn print_status(&mut self, snapshot: &PlayerSnapshot) -> Result<()> {
        let Some(track) = &snapshot.current_track else {
            writeln!(self.out, "Nothing is playing")?;
            return Ok(());
        };

        let state = if snapshot.is_playing { "Playing" } else { "Paused" };
        let heart = if snapshot.current_liked { " [liked]" } else { "" };
        writeln!(self.out, "{}: {}{}", state, describe(track), heart)?;

        let position = match snapshot.current_index {
            Some(index) => format!(
                "{} #{}",
                context_label(snapshot.context),
                index + 1
            ),
            None => context_label(snapshot.context).to_string(),
        };
        writeln!(
            self.out,
            "  {}  {}  shuffle {}  repeat {}",
            format_position(snapshot.current_time_seconds, snapshot.duration_seconds),
            position,
            on_off(snapshot.shuffle_enabled),
            on_off(snapshot.repeat_enabled)
        )?;
        Ok(())
    }

    fn print_list(&mut self, empty: &str, tracks: &[Track]) -> Result<()> {
        if tracks.is_empty() {
            writeln!(self.out, "{}", empty)?;
            Ok(())
        } else {
            self.print_tracks(tracks)
        }
    }

    fn print_tracks(&mut self, tracks: &[Track]) -> Result<()> {
        for (i, track) in tracks.iter().enumerate() {
            writeln!(
                self.out,
                "{:>3}. {}  [{}]",
                i + 1,
                describe(track),
                track.display_duration()
            )?;
        }
        Ok(())
    }

    fn print_playlists(&mut self, playlists: &[Playlist]) -> Result<()> {
        if playlists.is_empty() {
            writeln!(self.out, "No playlists")?;
        }
        for playlist in playlists {
            writeln!(self.out, "{:>5}  {}", playlist.id, playlist.name)?;
        }
        Ok(())
    }
}

fn describe(track: &Track) -> String {
    if track.artist.is_empty() {
        track.title.clone()
    } else {
        format!("{} - {}", track.title, track.artist)
    }
}

fn context_label(kind: ContextKind) -> &'static str {
    match kind {
        ContextKind::None => "single",
        ContextKind::Playlist => "playlist",
        ContextKind::LikedSet => "liked songs",
        ContextKind::SearchResults => "search results",
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn format_position(seconds: f64, duration_seconds: u32) -> String {
    let elapsed = seconds.max(0.0).floor() as u64;
    format!(
        "{}:{:02} / {}:{:02}",
        elapsed / 60,
        elapsed % 60,
        duration_seconds / 60,
        duration_seconds % 60
    )
}
