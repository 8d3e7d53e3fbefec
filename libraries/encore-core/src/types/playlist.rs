/// Playlist domain type
use crate::types::PlaylistId;
use serde::{Deserialize, Serialize};

/// Playlist summary owned by the current user
///
/// Track membership is fetched separately through `MusicApi::fetch_playlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Playlist identifier
    pub id: PlaylistId,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional cover image locator
    pub image_url: Option<String>,
}

impl Playlist {
    /// Create a playlist summary
    pub fn new(id: impl Into<PlaylistId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            image_url: None,
        }
    }
}

/// Name and cover of a playlist being created or edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDraft {
    /// Display name
    pub name: String,

    /// Cover image locator; `None` clears it on edit
    pub image_url: Option<String>,
}

impl PlaylistDraft {
    /// Draft with a name and no cover
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: None,
        }
    }

    /// Set the cover image locator
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Draft that renames `playlist`, keeping its cover
    pub fn renaming(playlist: &Playlist, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: playlist.image_url.clone(),
        }
    }
}
