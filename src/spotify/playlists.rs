use crate::{
    Res,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, Album, Artist, ChainEntry,
        CreatePlaylistRequest, CreatePlaylistResponse, Credential, ENTRY_OK, EntryStatus, Page,
        Playlist, PlaylistSummary, Song, SpotifyPlaylistTracksResponse,
        SpotifyPlaylistsResponse, SpotifyTrack,
    },
    utils,
};

use super::{ADD_TRACKS_CHUNK, SpotifyClient, TRACK_PAGE_SIZE, user_id};

impl SpotifyClient {
    /// Retrieves one page of the current user's playlists.
    ///
    /// # Arguments
    ///
    /// * `offset` - Index of the first playlist to return
    /// * `limit` - Page size (1-50)
    ///
    /// The returned [`Page`] carries the total Spotify reports so callers
    /// can tell when the listing is exhausted.
    pub async fn list_playlists(
        &self,
        credential: &Credential,
        offset: u32,
        limit: u32,
    ) -> Res<Page<PlaylistSummary>> {
        let path = format!("/users/{}/playlists", user_id(credential)?);
        let res: SpotifyPlaylistsResponse = self
            .get(
                credential,
                &path,
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;

        Ok(Page {
            items: res
                .items
                .into_iter()
                .map(|p| PlaylistSummary {
                    id: p.id,
                    name: p.name,
                    description: p.description.unwrap_or_default(),
                })
                .collect(),
            total: res.total,
        })
    }

    /// Fetches every track of a playlist, merging the pages in order.
    ///
    /// Items without a track (removed or unavailable local files) are
    /// skipped.
    pub async fn get_playlist(
        &self,
        credential: &Credential,
        summary: &PlaylistSummary,
    ) -> Res<Playlist> {
        let path = format!("/playlists/{}/tracks", summary.id);
        let path = path.as_str();
        let tracks = utils::fetch_all_pages(TRACK_PAGE_SIZE, |offset, limit| {
            self.playlist_tracks_page(credential, path, offset, limit)
        })
        .await?;

        Ok(Playlist {
            name: summary.name.clone(),
            description: summary.description.clone(),
            id: summary.id.clone(),
            songs: tracks.into_iter().map(to_song).collect(),
        })
    }

    async fn playlist_tracks_page(
        &self,
        credential: &Credential,
        path: &str,
        offset: u32,
        limit: u32,
    ) -> Res<Page<SpotifyTrack>> {
        let res: SpotifyPlaylistTracksResponse = self
            .get(
                credential,
                path,
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;

        Ok(Page {
            items: res.items.into_iter().filter_map(|w| w.track).collect(),
            total: res.total,
        })
    }

    /// Creates a public playlist owned by the logged in user.
    pub async fn create_playlist(
        &self,
        credential: &Credential,
        name: &str,
        description: &str,
    ) -> Res<String> {
        let path = format!("/users/{}/playlists", user_id(credential)?);
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: true,
            collaborative: false,
        };

        let res: CreatePlaylistResponse = self.post(credential, &path, &body).await?;
        Ok(res.id)
    }

    /// Adds the entries in chain order, 100 uris per request.
    ///
    /// Spotify keeps insertion order itself, so only the track ids of the
    /// chain are sent. A failed request marks every entry of its chunk with
    /// the error text; the remaining chunks are still sent.
    pub async fn add_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        entries: &[ChainEntry],
    ) -> Res<Vec<EntryStatus>> {
        let path = format!("/playlists/{}/tracks", playlist_id);
        let mut statuses = Vec::with_capacity(entries.len());

        for chunk in entries.chunks(ADD_TRACKS_CHUNK) {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.iter().map(|e| e.track_id.clone()).collect(),
            };

            let code = match self
                .post::<_, AddTrackToPlaylistResponse>(credential, &path, &body)
                .await
            {
                Ok(_) => ENTRY_OK.to_string(),
                Err(e) => e.to_string(),
            };

            statuses.extend(chunk.iter().map(|e| EntryStatus {
                id: e.client_id.clone(),
                code: code.clone(),
            }));
        }

        Ok(statuses)
    }
}

fn to_song(track: SpotifyTrack) -> Song {
    Song {
        name: track.name,
        album: Album {
            name: track.album.name,
        },
        artists: track
            .artists
            .into_iter()
            .map(|a| Artist { name: a.name })
            .collect(),
    }
}
