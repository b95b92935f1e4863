//! The closed set of streaming services plsync can talk to.
//!
//! Each variant of [`MusicService`] wraps one concrete adapter and exposes
//! the same capability set: authenticate, list, fetch, create, search and
//! add. Dispatch is a plain `match`, so adding a service means adding a
//! variant and handling it everywhere the compiler points at.

use std::fmt;

use clap::ValueEnum;
use serde::de::DeserializeOwned;

use crate::{
    Res,
    error::SyncError,
    gpm::GpmClient,
    spotify::SpotifyClient,
    types::{ChainEntry, Credential, EntryStatus, Page, Playlist, PlaylistSummary, SearchResult},
};

/// Service identifiers accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServiceKind {
    Spotify,
    /// Google Play Music
    Gpm,
}

impl ServiceKind {
    /// Human readable name used in log lines and errors.
    pub fn label(self) -> &'static str {
        match self {
            ServiceKind::Spotify => "Spotify",
            ServiceKind::Gpm => "Google Play Music",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKind::Spotify => write!(f, "spotify"),
            ServiceKind::Gpm => write!(f, "gpm"),
        }
    }
}

/// One configured adapter, cheap to clone into worker tasks.
#[derive(Debug, Clone)]
pub enum MusicService {
    Spotify(SpotifyClient),
    Gpm(GpmClient),
}

impl MusicService {
    /// Adapter for `kind` pointed at the configured API base URL.
    pub fn new(kind: ServiceKind) -> Self {
        match kind {
            ServiceKind::Spotify => MusicService::Spotify(SpotifyClient::default()),
            ServiceKind::Gpm => MusicService::Gpm(GpmClient::default()),
        }
    }

    /// Which service this adapter talks to.
    pub fn kind(&self) -> ServiceKind {
        match self {
            MusicService::Spotify(_) => ServiceKind::Spotify,
            MusicService::Gpm(_) => ServiceKind::Gpm,
        }
    }

    /// Interactive login. Everything after this only sees the credential.
    pub async fn authenticate(&self) -> Res<Credential> {
        match self {
            MusicService::Spotify(c) => c.authenticate().await,
            MusicService::Gpm(c) => c.authenticate(),
        }
    }

    /// Page size used when walking this service's playlist listing.
    pub fn playlist_page_size(&self) -> u32 {
        match self {
            MusicService::Spotify(_) => crate::spotify::PLAYLIST_PAGE_SIZE,
            MusicService::Gpm(_) => crate::gpm::PLAYLIST_PAGE_SIZE,
        }
    }

    /// Fetches one page of the user's playlists.
    ///
    /// Callers walk the whole listing with [`crate::utils::fetch_all_pages`]
    /// or stop early once they found what they need.
    ///
    /// # Arguments
    ///
    /// * `credential` - Credential returned by [`MusicService::authenticate`]
    /// * `offset` - Index of the first playlist on the page
    /// * `limit` - Page size, normally [`MusicService::playlist_page_size`]
    ///
    /// # Returns
    ///
    /// The page with the service's `total`, so the caller can tell whether
    /// another page follows.
    ///
    /// # Errors
    ///
    /// - `Transport` or `Parse` when the request or its body fails
    /// - `Unsupported` for Google Play Music, which cannot act as a source
    ///
    /// # Example
    ///
    /// ```
    /// let page = service.list_playlists(&credential, 0, 50).await?;
    /// for summary in &page.items {
    ///     info!("{}", summary.name);
    /// }
    /// ```
    pub async fn list_playlists(
        &self,
        credential: &Credential,
        offset: u32,
        limit: u32,
    ) -> Res<Page<PlaylistSummary>> {
        match self {
            MusicService::Spotify(c) => c.list_playlists(credential, offset, limit).await,
            MusicService::Gpm(_) => Err(unsupported(self.kind(), "listing playlists")),
        }
    }

    /// Reads a playlist with every song, merging all track pages in order.
    ///
    /// Entries the service returns without track data (removed or local
    /// files) are skipped.
    ///
    /// # Arguments
    ///
    /// * `credential` - Credential returned by [`MusicService::authenticate`]
    /// * `summary` - Listing row of the playlist to read
    ///
    /// # Errors
    ///
    /// Same as [`MusicService::list_playlists`]. A failure on any track page
    /// fails the whole playlist.
    pub async fn get_playlist(
        &self,
        credential: &Credential,
        summary: &PlaylistSummary,
    ) -> Res<Playlist> {
        match self {
            MusicService::Spotify(c) => c.get_playlist(credential, summary).await,
            MusicService::Gpm(_) => Err(unsupported(self.kind(), "reading playlists")),
        }
    }

    /// Creates an empty playlist and returns the id the service assigned.
    pub async fn create_playlist(
        &self,
        credential: &Credential,
        name: &str,
        description: &str,
    ) -> Res<String> {
        match self {
            MusicService::Spotify(c) => c.create_playlist(credential, name, description).await,
            MusicService::Gpm(c) => c.create_playlist(credential, name, description).await,
        }
    }

    /// Runs one catalog search for `query`.
    ///
    /// # Returns
    ///
    /// The candidates in the service's ranking, plus the suggested query
    /// when the service thinks `query` was misspelled. Following the
    /// suggestion is left to [`crate::resolver::Resolver`].
    pub async fn search_track(&self, credential: &Credential, query: &str) -> Res<SearchResult> {
        match self {
            MusicService::Spotify(c) => c.search_track(credential, query).await,
            MusicService::Gpm(c) => c.search_track(credential, query).await,
        }
    }

    /// Appends `entries` to a playlist, returning one status per entry in
    /// submission order.
    pub async fn add_tracks(
        &self,
        credential: &Credential,
        playlist_id: &str,
        entries: &[ChainEntry],
    ) -> Res<Vec<EntryStatus>> {
        match self {
            MusicService::Spotify(c) => c.add_tracks(credential, playlist_id, entries).await,
            MusicService::Gpm(c) => c.add_tracks(credential, entries).await,
        }
    }
}

fn unsupported(kind: ServiceKind, operation: &'static str) -> SyncError {
    SyncError::Unsupported {
        service: kind.label(),
        operation,
    }
}

/// Checks the status and decodes the body of an API response.
///
/// Non-success statuses keep the raw body in the error so the service's
/// own explanation reaches the user.
pub(crate) async fn read_json<T: DeserializeOwned>(
    path: &str,
    response: reqwest::Response,
) -> Res<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SyncError::request(path, e))?;

    if !status.is_success() {
        return Err(SyncError::Transport {
            path: path.to_string(),
            status: Some(status.as_u16()),
            message: body,
        });
    }

    serde_json::from_str(&body).map_err(|e| SyncError::parse(path, e))
}
