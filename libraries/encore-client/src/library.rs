//! Song and playlist endpoints.

use crate::client::{check_status, parse_json, send, EncoreClient};
use crate::error::{ClientError, Result};
use crate::types::{
    AddSongRequest, ListResponse, PlaylistEnvelope, PlaylistRequest, PlaylistResponse,
    RecentlyPlayedRequest, ServerPlaylist, ServerSong,
};
use async_trait::async_trait;
use encore_core::{MusicApi, Playlist, PlaylistDraft, PlaylistId, Track, TrackId};
use tracing::debug;

fn into_tracks(songs: Vec<ServerSong>) -> Vec<Track> {
    songs.into_iter().map(Track::from).collect()
}

impl EncoreClient {
    /// Get every song in the catalog.
    pub async fn get_songs(&self) -> Result<Vec<Track>> {
        let url = self.endpoint("/api/songs").await;
        debug!(url = %url, "Fetching catalog");

        let request = self.with_optional_auth(self.http.get(&url)).await;
        let songs: ListResponse<ServerSong> = parse_json(send(request).await?, "songs").await?;
        let tracks = into_tracks(songs.into_items());

        debug!(tracks = tracks.len(), "Fetched catalog");
        Ok(tracks)
    }

    /// Search songs by title, artist or album.
    pub async fn search_songs(&self, query: &str) -> Result<Vec<Track>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::InvalidInput(
                "Search query is required".to_string(),
            ));
        }

        let url = self.endpoint("/api/songs/search").await;
        debug!(url = %url, query = %query, "Searching songs");

        let request = self
            .with_optional_auth(self.http.get(&url).query(&[("query", query)]))
            .await;
        let songs: ListResponse<ServerSong> =
            parse_json(send(request).await?, "search results").await?;

        Ok(into_tracks(songs.into_items()))
    }

    /// Get the songs the current user liked.
    pub async fn get_liked_songs(&self) -> Result<Vec<Track>> {
        let (url, token) = self.authorized("/api/songs/user/liked").await?;
        debug!(url = %url, "Fetching liked songs");

        let request = self.http.get(&url).bearer_auth(token);
        let songs: ListResponse<ServerSong> =
            parse_json(send(request).await?, "liked songs").await?;

        Ok(into_tracks(songs.into_items()))
    }

    /// Like a song.
    pub async fn like_song(&self, song_id: &str) -> Result<()> {
        let (url, token) = self
            .authorized(&format!("/api/songs/{}/like", song_id))
            .await?;
        debug!(url = %url, "Liking song");

        check_status(send(self.http.post(&url).bearer_auth(token)).await?).await?;
        Ok(())
    }

    /// Remove a like.
    pub async fn unlike_song(&self, song_id: &str) -> Result<()> {
        let (url, token) = self
            .authorized(&format!("/api/songs/{}/like", song_id))
            .await?;
        debug!(url = %url, "Unliking song");

        check_status(send(self.http.delete(&url).bearer_auth(token)).await?).await?;
        Ok(())
    }

    /// Report that playback of a song started.
    pub async fn add_recently_played(&self, song_id: &str) -> Result<()> {
        let (url, token) = self.authorized("/api/songs/recently-played").await?;
        debug!(url = %url, song_id = %song_id, "Recording recently played");

        let request = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&RecentlyPlayedRequest { song_id });
        check_status(send(request).await?).await?;
        Ok(())
    }

    /// Get the user's recently played songs, most recent first.
    pub async fn get_recently_played(&self) -> Result<Vec<Track>> {
        let (url, token) = self.authorized("/api/songs/recently-played").await?;
        debug!(url = %url, "Fetching recently played");

        let request = self.http.get(&url).bearer_auth(token);
        let songs: ListResponse<ServerSong> =
            parse_json(send(request).await?, "recently played").await?;

        Ok(into_tracks(songs.into_items()))
    }

    /// List the user's playlists.
    pub async fn get_playlists(&self) -> Result<Vec<Playlist>> {
        let (url, token) = self.authorized("/api/playlists").await?;
        debug!(url = %url, "Fetching playlists");

        let request = self.http.get(&url).bearer_auth(token);
        let playlists: ListResponse<ServerPlaylist> =
            parse_json(send(request).await?, "playlists").await?;

        Ok(playlists
            .into_items()
            .into_iter()
            .map(Playlist::from)
            .collect())
    }

    /// Get the ordered songs of a playlist.
    pub async fn get_playlist_songs(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let (url, token) = self
            .authorized(&format!("/api/playlists/{}", playlist_id))
            .await?;
        debug!(url = %url, "Fetching playlist");

        let request = self.http.get(&url).bearer_auth(token);
        let playlist: PlaylistResponse = parse_json(send(request).await?, "playlist").await?;

        debug!(
            playlist_id = %playlist_id,
            tracks = playlist.songs.len(),
            "Fetched playlist"
        );
        Ok(into_tracks(playlist.songs))
    }

    /// Create a playlist.
    pub async fn create_playlist(&self, draft: &PlaylistDraft) -> Result<Playlist> {
        let name = validated_name(draft)?;
        let (url, token) = self.authorized("/api/playlists").await?;
        debug!(url = %url, name = %name, "Creating playlist");

        let request = self.http.post(&url).bearer_auth(token).json(&PlaylistRequest {
            name,
            img_url: draft.image_url.as_deref(),
        });
        let created: PlaylistEnvelope = parse_json(send(request).await?, "playlist").await?;

        Ok(created.playlist.into())
    }

    /// Replace a playlist's name and cover.
    ///
    /// The server stores exactly what is sent: a draft without a cover
    /// clears it.
    pub async fn update_playlist(&self, playlist_id: &str, draft: &PlaylistDraft) -> Result<Playlist> {
        let name = validated_name(draft)?;
        let (url, token) = self
            .authorized(&format!("/api/playlists/{}", playlist_id))
            .await?;
        debug!(url = %url, name = %name, "Updating playlist");

        let request = self.http.put(&url).bearer_auth(token).json(&PlaylistRequest {
            name,
            img_url: draft.image_url.as_deref(),
        });
        let updated: PlaylistEnvelope = parse_json(send(request).await?, "playlist").await?;

        Ok(updated.playlist.into())
    }

    /// Delete a playlist.
    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<()> {
        let (url, token) = self
            .authorized(&format!("/api/playlists/{}", playlist_id))
            .await?;
        debug!(url = %url, "Deleting playlist");

        check_status(send(self.http.delete(&url).bearer_auth(token)).await?).await?;
        Ok(())
    }

    /// Append a song to a playlist.
    pub async fn add_song_to_playlist(&self, playlist_id: &str, song_id: &str) -> Result<()> {
        let (url, token) = self
            .authorized(&format!("/api/playlists/{}/songs", playlist_id))
            .await?;
        debug!(url = %url, song_id = %song_id, "Adding song to playlist");

        let request = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&AddSongRequest { song_id });
        check_status(send(request).await?).await?;
        Ok(())
    }

    /// Remove a song from a playlist.
    pub async fn remove_song_from_playlist(&self, playlist_id: &str, song_id: &str) -> Result<()> {
        let (url, token) = self
            .authorized(&format!("/api/playlists/{}/songs/{}", playlist_id, song_id))
            .await?;
        debug!(url = %url, "Removing song from playlist");

        check_status(send(self.http.delete(&url).bearer_auth(token)).await?).await?;
        Ok(())
    }
}

fn validated_name(draft: &PlaylistDraft) -> Result<&str> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(ClientError::InvalidInput(
            "Playlist name is required".to_string(),
        ));
    }
    Ok(name)
}

#[async_trait]
impl MusicApi for EncoreClient {
    async fn fetch_catalog(&self) -> encore_core::Result<Vec<Track>> {
        Ok(self.get_songs().await?)
    }

    async fn fetch_liked_tracks(&self) -> encore_core::Result<Vec<Track>> {
        Ok(self.get_liked_songs().await?)
    }

    async fn like_track(&self, track_id: &TrackId) -> encore_core::Result<()> {
        Ok(self.like_song(track_id.as_str()).await?)
    }

    async fn unlike_track(&self, track_id: &TrackId) -> encore_core::Result<()> {
        Ok(self.unlike_song(track_id.as_str()).await?)
    }

    async fn record_recently_played(&self, track_id: &TrackId) -> encore_core::Result<()> {
        Ok(self.add_recently_played(track_id.as_str()).await?)
    }

    async fn fetch_playlist(&self, playlist_id: &PlaylistId) -> encore_core::Result<Vec<Track>> {
        Ok(self.get_playlist_songs(playlist_id.as_str()).await?)
    }

    async fn search_tracks(&self, query: &str) -> encore_core::Result<Vec<Track>> {
        Ok(self.search_songs(query).await?)
    }

    async fn fetch_recently_played(&self) -> encore_core::Result<Vec<Track>> {
        Ok(self.get_recently_played().await?)
    }

    async fn fetch_playlists(&self) -> encore_core::Result<Vec<Playlist>> {
        Ok(self.get_playlists().await?)
    }

    async fn create_playlist(&self, draft: &PlaylistDraft) -> encore_core::Result<Playlist> {
        Ok(Self::create_playlist(self, draft).await?)
    }

    async fn update_playlist(
        &self,
        playlist_id: &PlaylistId,
        draft: &PlaylistDraft,
    ) -> encore_core::Result<Playlist> {
        Ok(Self::update_playlist(self, playlist_id.as_str(), draft).await?)
    }

    async fn delete_playlist(&self, playlist_id: &PlaylistId) -> encore_core::Result<()> {
        Ok(Self::delete_playlist(self, playlist_id.as_str()).await?)
    }

    async fn add_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> encore_core::Result<()> {
        Ok(self
            .add_song_to_playlist(playlist_id.as_str(), track_id.as_str())
            .await?)
    }

    async fn remove_from_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> encore_core::Result<()> {
        Ok(self
            .remove_song_from_playlist(playlist_id.as_str(), track_id.as_str())
            .await?)
    }
}
