//! Domain types shared across Encore

mod account;
mod ids;
mod playlist;
mod track;

pub use account::{Account, Registration};
pub use ids::{PlaylistId, TrackId};
pub use playlist::{Playlist, PlaylistDraft};
pub use track::Track;
