use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

// ---------------------------------------------------------------------------
// Service independent model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub name: String,
    pub album: Album,
    pub artists: Vec<Artist>,
}

impl Song {
    pub fn new(name: &str, album: &str, artists: &[&str]) -> Self {
        Song {
            name: name.to_string(),
            album: Album {
                name: album.to_string(),
            },
            artists: artists
                .iter()
                .map(|a| Artist {
                    name: a.to_string(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.artists.first() {
            Some(artist) => write!(f, "'{}' by {}", self.name, artist.name),
            None => write!(f, "'{}'", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    pub description: String,
    pub id: String,
    pub songs: Vec<Song>,
}

/// One row of a playlist listing, before its tracks are fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// One offset page of a listing together with the collection size the
/// service reported.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u32,
}

impl<T> Page<T> {
    /// Offset of the page after this one, or `None` once `offset + limit`
    /// reaches the reported total.
    pub fn next_offset(&self, offset: u32, limit: u32) -> Option<u32> {
        let next = offset + limit;
        if next >= self.total { None } else { Some(next) }
    }
}

/// Login result handed to every adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub user_id: Option<String>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential {
            token: token.into(),
            user_id: None,
        }
    }

    pub fn with_user(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Credential {
            token: token.into(),
            user_id: Some(user_id.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    Track,
    Artist,
    Album,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub external_id: String,
    pub item_type: ItemType,
    pub name: String,
    pub artist: String,
    pub album: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub suggested_query: Option<String>,
    pub candidates: Vec<SearchCandidate>,
}

/// Which part of the destination catalog a track id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSource {
    /// Uploaded or purchased track in the user's library
    Library,
    /// Subscription store track, ids start with `T`
    Store,
}

impl TrackSource {
    pub fn for_track(track_id: &str) -> Self {
        if track_id.starts_with('T') {
            TrackSource::Store
        } else {
            TrackSource::Library
        }
    }

    pub fn code(self) -> u8 {
        match self {
            TrackSource::Library => 1,
            TrackSource::Store => 2,
        }
    }
}

/// One node of the doubly linked ordering submitted to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    pub client_id: String,
    pub previous_id: Option<String>,
    pub next_id: Option<String>,
    pub track_id: String,
    pub playlist_id: String,
    pub source: TrackSource,
}

/// Per-entry answer of a batched add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStatus {
    pub id: String,
    pub code: String,
}

pub const ENTRY_OK: &str = "OK";

impl EntryStatus {
    pub fn is_ok(&self) -> bool {
        self.code == ENTRY_OK
    }
}

#[derive(Tabled)]
pub struct SyncTableRow {
    pub playlist: String,
    pub songs: usize,
    pub added: usize,
    pub failed: usize,
    pub status: String,
}

// ---------------------------------------------------------------------------
// Spotify Web API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylistsResponse {
    pub items: Vec<SpotifyPlaylist>,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylistTracksResponse {
    pub items: Vec<SpotifyTrackWrapper>,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrackWrapper {
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    pub album: SpotifyAlbum,
    pub artists: Vec<SpotifyArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifySearchResponse {
    pub tracks: SpotifySearchTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifySearchTracks {
    pub items: Vec<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Body of the accounts service token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

// ---------------------------------------------------------------------------
// Google Play Music (sj/v2.5)
// ---------------------------------------------------------------------------

pub const GPM_PLAYLIST_TYPE: &str = "USER_GENERATED";
pub const GPM_PLAYLIST_SHARESTATE_PUBLIC: &str = "PUBLIC";
pub const GPM_NEW_ENTITY_TIMESTAMP: &str = "-1";
pub const GPM_UNMODIFIED_TIMESTAMP: &str = "0";
pub const GPM_ITEM_TYPE_TRACK: &str = "1";
pub const GPM_ITEM_TYPE_ARTIST: &str = "2";
pub const GPM_ITEM_TYPE_ALBUM: &str = "3";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpmMutations<T> {
    pub mutations: Vec<GpmCreate<T>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpmCreate<T> {
    pub create: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpmPlaylist {
    pub creation_timestamp: String,
    pub deleted: bool,
    pub last_modified_timestamp: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub playlist_type: String,
    pub share_state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpmSongEntry {
    pub creation_timestamp: String,
    pub deleted: bool,
    pub last_modified_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preceding_entry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following_entry_id: Option<String>,
    pub client_id: String,
    pub source: u8,
    pub playlist_id: String,
    pub track_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpmMutateResponse {
    #[serde(default)]
    pub mutate_response: Vec<GpmMutateResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpmMutateResult {
    #[serde(default)]
    pub id: String,
    pub response_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpmSearchResponse {
    #[serde(default)]
    pub suggested_query: Option<String>,
    #[serde(default)]
    pub entries: Vec<GpmSearchEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpmSearchEntry {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub track: Option<GpmTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GpmTrack {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub store_id: Option<String>,
}
