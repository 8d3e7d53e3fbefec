//! Types for Encore API requests and responses.

use encore_core::{Account, Playlist, Track};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Configuration for connecting to the music service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "http://localhost:5000")
    pub url: String,
    /// Bearer token (if authenticated)
    pub token: Option<String>,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
        }
    }

    /// Create a config with an existing token.
    pub fn with_token(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: Some(token.into()),
        }
    }
}

// =============================================================================
// Authentication Types
// =============================================================================

/// Request body for login endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response from successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<LoginResponse> for Account {
    fn from(login: LoginResponse) -> Self {
        Self {
            name: login.name,
            is_admin: login.is_admin,
        }
    }
}

// =============================================================================
// Song Types
// =============================================================================

/// Identifier as sent by the server: database ids arrive as numbers,
/// everything else as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A song as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSong {
    pub id: RawId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: u32,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default, alias = "img_url", alias = "image")]
    pub image_url: Option<String>,
}

impl From<ServerSong> for Track {
    fn from(song: ServerSong) -> Self {
        let mut track = Track::new(
            song.id.to_string(),
            song.title.unwrap_or_default(),
            song.artist.unwrap_or_default(),
        )
        .with_duration_seconds(song.duration);

        track.album = song.album.filter(|a| !a.is_empty());
        track.audio_url = song.audio_url.filter(|u| !u.trim().is_empty());
        track.image_url = song.image_url.filter(|u| !u.trim().is_empty());
        track
    }
}

/// Request body for recently-played reporting.
#[derive(Debug, Serialize)]
pub(crate) struct RecentlyPlayedRequest<'a> {
    #[serde(rename = "songId")]
    pub song_id: &'a str,
}

// =============================================================================
// Playlist Types
// =============================================================================

/// A playlist as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerPlaylist {
    pub id: RawId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "img_url", alias = "image")]
    pub image_url: Option<String>,
}

impl From<ServerPlaylist> for Playlist {
    fn from(playlist: ServerPlaylist) -> Self {
        let mut converted = Playlist::new(
            playlist.id.to_string(),
            playlist.name.unwrap_or_default(),
        );
        converted.description = playlist.description;
        converted.image_url = playlist.image_url.filter(|u| !u.trim().is_empty());
        converted
    }
}

/// Request body for creating or editing a playlist.
#[derive(Debug, Serialize)]
pub(crate) struct PlaylistRequest<'a> {
    pub name: &'a str,
    pub img_url: Option<&'a str>,
}

/// Request body for adding a song to a playlist.
#[derive(Debug, Serialize)]
pub(crate) struct AddSongRequest<'a> {
    #[serde(rename = "songId")]
    pub song_id: &'a str,
}

/// Single playlist returned by create (`playlist`) and update (`data`).
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistEnvelope {
    #[serde(alias = "data")]
    pub playlist: ServerPlaylist,
}

/// Response from the single-playlist endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistResponse {
    #[serde(default)]
    pub songs: Vec<ServerSong>,
}

// =============================================================================
// Envelopes
// =============================================================================

/// List response: `{ success, count?, data }` or, on some endpoints,
/// `{ success, songs }` / `{ success, playlists }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListResponse<T> {
    Wrapped {
        #[serde(alias = "songs", alias = "playlists")]
        data: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(items) => items,
        }
    }
}

/// Error body: `{ message, error? }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

// =============================================================================
// Duration parsing
// =============================================================================

fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, parse_duration))
}

/// Duration in whole seconds from a JSON number, a numeric string or
/// `m:ss` / `h:mm:ss` text. Anything else is 0.
pub(crate) fn parse_duration(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u64)
            })
            .map_or(0, saturate),
        Value::String(s) => parse_duration_text(s),
        _ => 0,
    }
}

fn parse_duration_text(text: &str) -> u32 {
    let text = text.trim();

    if text.contains(':') {
        return text
            .split(':')
            .try_fold(0u64, |acc, part| {
                part.trim()
                    .parse::<u64>()
                    .ok()
                    .map(|n| acc.saturating_mul(60).saturating_add(n))
            })
            .map_or(0, saturate);
    }

    text.parse::<u64>()
        .ok()
        .or_else(|| {
            text.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        })
        .map_or(0, saturate)
}

fn saturate(seconds: u64) -> u32 {
    u32::try_from(seconds).unwrap_or(u32::MAX)
}
