//! Line commands of the interactive prompt
//!
//! Numbers typed by the user are 1-based, as listed on screen; parsed
//! commands carry 0-based indexes.

use std::str::FromStr;
use thiserror::Error;

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  status                 what is playing
  queue                  tracks coming up in the current context
  history                recently played in this session
  catalog                list all songs
  play <n>               play catalog song n on its own
  liked [n]              list liked songs, or play them from n
  playlists              list your playlists
  playlist <id> [n]      play a playlist from song n (default 1)
  playlist-new <name>    create a playlist
  playlist-rename <id> <name>
                         rename a playlist
  playlist-delete <id>   delete a playlist
  playlist-add <id> <n>  add catalog song n to a playlist
  playlist-remove <id> <n>
                         remove song n of a playlist
  search <query>         search songs
  result <n>             play search results from n
  next | prev            skip forward or back
  ended                  the current song finished
  tick <secs>            advance the playback clock
  seek <secs>            jump to a position
  pause | resume         pause or resume
  shuffle | repeat       toggle shuffle or repeat
  like [n]               like/unlike the current song or catalog song n
  recent                 recently played, from the server
  register <email> <password> <name>
                         create an account and sign in
  login <email> <password>
                         sign in
  help                   this text
  quit                   save settings and exit";

/// Password typed at the prompt; never shown in debug output
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Status,
    Queue,
    History,
    Catalog,
    Play(usize),
    Liked(Option<usize>),
    Playlists,
    Playlist { id: String, index: usize },
    PlaylistNew(String),
    PlaylistRename { id: String, name: String },
    PlaylistDelete(String),
    PlaylistAdd { id: String, index: usize },
    PlaylistRemove { id: String, index: usize },
    Search(String),
    Result(usize),
    Next,
    Prev,
    Ended,
    Tick(f64),
    Seek(f64),
    Pause,
    Resume,
    Shuffle,
    Repeat,
    Like(Option<usize>),
    Recent,
    Register {
        email: String,
        password: Password,
        name: String,
    },
    Login {
        email: String,
        password: Password,
    },
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (type 'help')")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Not a valid number: {0}")]
    InvalidNumber(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, rest)| (name, rest.trim()));

        if name.is_empty() {
            return Err(CommandError::Empty);
        }

        let command = match name.to_lowercase().as_str() {
            "status" | "s" => Self::Status,
            "queue" | "q" => Self::Queue,
            "history" | "h" => Self::History,
            "catalog" | "songs" => Self::Catalog,
            "play" | "p" => Self::Play(required_position(rest, "play", "a song number")?),
            "liked" => Self::Liked(optional_position(rest)?),
            "playlists" => Self::Playlists,
            "playlist" => {
                let mut args = rest.split_whitespace();
                let id = args.next().ok_or(CommandError::MissingArgument {
                    command: "playlist",
                    argument: "a playlist id",
                })?;
                let index = optional_position(args.next().unwrap_or(""))?.unwrap_or(0);
                Self::Playlist {
                    id: id.to_string(),
                    index,
                }
            }
            "playlist-new" => Self::PlaylistNew(required_text(rest, "playlist-new", "a name")?),
            "playlist-rename" => {
                let (id, name) = id_and_rest(rest, "playlist-rename", "an id and a new name")?;
                Self::PlaylistRename {
                    id,
                    name: required_text(name, "playlist-rename", "an id and a new name")?,
                }
            }
            "playlist-delete" => {
                let (id, _) = id_and_rest(rest, "playlist-delete", "a playlist id")?;
                Self::PlaylistDelete(id)
            }
            "playlist-add" => {
                let (id, n) = id_and_rest(rest, "playlist-add", "an id and a song number")?;
                Self::PlaylistAdd {
                    id,
                    index: required_position(n, "playlist-add", "an id and a song number")?,
                }
            }
            "playlist-remove" => {
                let (id, n) = id_and_rest(rest, "playlist-remove", "an id and a song number")?;
                Self::PlaylistRemove {
                    id,
                    index: required_position(n, "playlist-remove", "an id and a song number")?,
                }
            }
            "search" | "/" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "search",
                        argument: "a query",
                    });
                }
                Self::Search(rest.to_string())
            }
            "result" | "r" => Self::Result(required_position(rest, "result", "a result number")?),
            "next" | "n" => Self::Next,
            "prev" | "previous" => Self::Prev,
            "ended" => Self::Ended,
            "tick" => Self::Tick(required_seconds(rest, "tick")?),
            "seek" => Self::Seek(required_seconds(rest, "seek")?),
            "pause" => Self::Pause,
            "resume" | "play!" => Self::Resume,
            "shuffle" => Self::Shuffle,
            "repeat" => Self::Repeat,
            "like" => Self::Like(optional_position(rest)?),
            "recent" => Self::Recent,
            "register" => {
                let missing = CommandError::MissingArgument {
                    command: "register",
                    argument: "an email, a password and a name",
                };
                let mut args = rest.splitn(3, char::is_whitespace);
                match (args.next(), args.next(), args.next().map(str::trim)) {
                    (Some(email), Some(password), Some(name))
                        if !email.is_empty() && !password.is_empty() && !name.is_empty() =>
                    {
                        Self::Register {
                            email: email.to_string(),
                            password: Password::new(password),
                            name: name.to_string(),
                        }
                    }
                    _ => return Err(missing),
                }
            }
            "login" => {
                let mut args = rest.split_whitespace();
                match (args.next(), args.next()) {
                    (Some(email), Some(password)) => Self::Login {
                        email: email.to_string(),
                        password: Password::new(password),
                    },
                    _ => {
                        return Err(CommandError::MissingArgument {
                            command: "login",
                            argument: "an email and a password",
                        })
                    }
                }
            }
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

/// 1-based number typed by the user, as a 0-based index
fn parse_position(text: &str) -> Result<usize, CommandError> {
    match text.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::InvalidNumber(text.to_string())),
    }
}

fn optional_position(text: &str) -> Result<Option<usize>, CommandError> {
    if text.is_empty() {
        Ok(None)
    } else {
        parse_position(text).map(Some)
    }
}

fn required_position(
    text: &str,
    command: &'static str,
    argument: &'static str,
) -> Result<usize, CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingArgument { command, argument });
    }
    parse_position(text)
}

fn required_text(
    text: &str,
    command: &'static str,
    argument: &'static str,
) -> Result<String, CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingArgument { command, argument });
    }
    Ok(text.to_string())
}

/// First word as an id, the trimmed remainder as the rest
fn id_and_rest<'a>(
    text: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<(String, &'a str), CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingArgument { command, argument });
    }
    let (id, rest) = text
        .split_once(char::is_whitespace)
        .map_or((text, ""), |(id, rest)| (id, rest.trim()));
    Ok((id.to_string(), rest))
}

fn required_seconds(text: &str, command: &'static str) -> Result<f64, CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "a number of seconds",
        });
    }

    text.parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .ok_or_else(|| CommandError::InvalidNumber(text.to_string()))
}
