//! # Google Play Music Module
//!
//! Adapter for the mobile client API (`sj/v2.5`). It is used as the
//! destination of a transfer: playlists are created with a mutation batch,
//! tracks are found through the store search and appended as a linked
//! chain of playlist entries in a single batch.
//!
//! Every request carries the fixed parameters `tier=aa`, `hl=en_US`,
//! `dv=0` and `alt=json`, a JSON content type and an
//! `Authorization: GoogleLogin auth=<token>` header.
//!
//! Reading playlists back is not supported; [`crate::service::MusicService`]
//! reports it as [`SyncError::Unsupported`].

mod playlists;
mod search;

use reqwest::{
    Client,
    header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    Res, config,
    error::SyncError,
    info,
    service::read_json,
    types::Credential,
    utils,
};

pub const PLAYLIST_PAGE_SIZE: u32 = 50;
pub const MAX_SEARCH_RESULTS: &str = "10";

pub const PATH_CREATE_PLAYLIST: &str = "playlistbatch";
pub const PATH_SEARCH: &str = "query";
pub const PATH_ADD_SONGS_TO_PLAYLIST: &str = "plentriesbatch";

const FIXED_PARAMS: [(&str, &str); 4] = [("tier", "aa"), ("hl", "en_US"), ("dv", "0"), ("alt", "json")];

const GPM: &str = "Google Play Music";

#[derive(Debug, Clone)]
pub struct GpmClient {
    http: Client,
    api_url: String,
}

impl Default for GpmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GpmClient {
    pub fn new() -> Self {
        Self::with_base_url(config::gpm_apiurl())
    }

    pub fn with_base_url(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        GpmClient {
            http: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads the auth token from `GPM_AUTH_TOKEN` or the prompt.
    pub fn authenticate(&self) -> Res<Credential> {
        let token = match config::gpm_token() {
            Some(token) => token,
            None => {
                info!(
                    "Enter a Google Play Music auth token.\n    With 2-step verification create an app specific password at https://security.google.com/settings/security/apppasswords first."
                );
                utils::prompt("Token:").map_err(|e| SyncError::auth(GPM, e.to_string()))?
            }
        };

        if token.is_empty() {
            return Err(SyncError::auth(GPM, "no auth token provided"));
        }
        Ok(Credential::new(token))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        query: &[(&str, &str)],
    ) -> Res<T> {
        let response = self
            .http
            .get(format!("{}/{}", self.api_url, path))
            .query(query)
            .query(&FIXED_PARAMS)
            .header(AUTHORIZATION, auth_header(credential))
            .header(CONTENT_TYPE, "application/json")
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
            .post(format!("{}/{}", self.api_url, path))
            .query(&FIXED_PARAMS)
            .header(AUTHORIZATION, auth_header(credential))
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| SyncError::request(path, e))?;

        read_json(path, response).await
    }
}

fn auth_header(credential: &Credential) -> String {
    format!("GoogleLogin auth={}", credential.token)
}
