//! # Spotify Integration Module
//!
//! Adapter for the Spotify Web API. Spotify is usually the source of a
//! transfer, but the adapter implements the full capability set so it can
//! be a destination too.
//!
//! ## Submodules
//!
//! - [`auth`] - Login for a sync run and the OAuth 2.0 PKCE flow behind
//!   `plsync auth`
//! - [`playlists`] - Listing, reading, creating and filling playlists
//! - [`search`] - Catalog search used by the track resolver
//!
//! ## Endpoints
//!
//! - `GET /me` - Current user, validates the token
//! - `GET /users/{user_id}/playlists` - Offset paged playlist listing
//! - `GET /playlists/{playlist_id}/tracks` - Offset paged playlist items
//! - `GET /search` - Track search
//! - `POST /users/{user_id}/playlists` - Create a playlist
//! - `POST /playlists/{playlist_id}/tracks` - Add up to 100 tracks
//!
//! All requests use bearer authentication with the token carried by the
//! [`Credential`]. A non-success status is reported with the request path,
//! the status code and the raw body; nothing is retried.

pub mod auth;
pub mod playlists;
pub mod search;

use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Res, config,
    error::SyncError,
    service::read_json,
    types::{Credential, SpotifyUser},
};

pub const PLAYLIST_PAGE_SIZE: u32 = 50;
pub const TRACK_PAGE_SIZE: u32 = 100;
pub const SEARCH_LIMIT: u32 = 10;
pub const ADD_TRACKS_CHUNK: usize = 100;

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl Default for SpotifyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SpotifyClient {
    pub fn new() -> Self {
        Self::with_base_url(config::spotify_apiurl())
    }

    pub fn with_base_url(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        SpotifyClient {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn current_user(&self, credential: &Credential) -> Res<SpotifyUser> {
        self.get(credential, "/me", &[]).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        query: &[(&str, String)],
    ) -> Res<T> {
        let response = self
            .http
            .get(format!("{}{}", self.api_url, path))
            .query(query)
            .bearer_auth(&credential.token)
            .send()
            .await
            .map_err(|e| SyncError::request(path, e))?;

        read_json(path, response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        body: &B,
    ) -> Res<T> {
        let response = self
            .http
            .post(format!("{}{}", self.api_url, path))
            .bearer_auth(&credential.token)
            .json(body)
            .send()
            .await
            .map_err(|e| SyncError::request(path, e))?;

        read_json(path, response).await
    }
}

/// The Spotify user id resolved at login; listing and creating playlists
/// are scoped to it.
fn user_id(credential: &Credential) -> Res<&str> {
    credential
        .user_id
        .as_deref()
        .ok_or_else(|| SyncError::auth("Spotify", "credential carries no user id"))
}
