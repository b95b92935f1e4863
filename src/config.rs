//! Configuration management for plsync.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Environment variables set in the shell
//! take precedence over the file because `dotenv` never overwrites an
//! existing variable.
//!
//! Everything has a sensible default except the Spotify client id, which is
//! only needed by `plsync auth`.

use std::{env, path::PathBuf};

use crate::{Res, error::SyncError};

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_GPM_API_URL: &str = "https://mclients.googleapis.com/sj/v2.5";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_SCOPE: &str = "playlist-read-private playlist-read-collaborative playlist-modify-public playlist-modify-private user-read-private";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_RESOLVE_WORKERS: usize = 4;
pub const DEFAULT_SUGGESTION_ROUNDS: usize = 5;

/// Loads environment variables from `.env` in the local data directory.
///
/// The file lives at:
/// - Linux: `~/.local/share/plsync/.env`
/// - macOS: `~/Library/Application Support/plsync/.env`
/// - Windows: `%LOCALAPPDATA%/plsync/.env`
///
/// A missing file is not an error; everything can be passed through the
/// environment instead.
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| {
            SyncError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
    }
    Ok(())
}

/// Root of everything plsync keeps on disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("plsync");
    path
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    non_empty(key)
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

/// Google Play Music `sj` API base URL (`GPM_API_URL`).
pub fn gpm_apiurl() -> String {
    var_or("GPM_API_URL", DEFAULT_GPM_API_URL)
}

/// Pre-issued Spotify access token (`SPOTIFY_OAUTH_TOKEN`), skips the prompt.
pub fn spotify_token() -> Option<String> {
    non_empty("SPOTIFY_OAUTH_TOKEN")
}

/// Google Play Music auth token (`GPM_AUTH_TOKEN`), skips the prompt.
pub fn gpm_token() -> Option<String> {
    non_empty("GPM_AUTH_TOKEN")
}

/// Spotify application client id used by the PKCE flow.
pub fn spotify_client_id() -> Res<String> {
    non_empty("SPOTIFY_API_AUTH_CLIENT_ID").ok_or_else(|| {
        SyncError::Config("SPOTIFY_API_AUTH_CLIENT_ID must be set to run plsync auth".into())
    })
}

/// OAuth redirect URI registered with the Spotify application.
///
/// Reads `SPOTIFY_API_REDIRECT_URI`. It has to point at the callback route
/// of the local server, so the default is derived from [`server_addr`].
///
/// # Returns
///
/// The configured URI, or `http://<SERVER_ADDRESS>/callback`.
///
/// # Example
///
/// ```
/// // SERVER_ADDRESS unset, SPOTIFY_API_REDIRECT_URI unset
/// assert_eq!(spotify_redirect_uri(), "http://127.0.0.1:8888/callback");
/// ```
pub fn spotify_redirect_uri() -> String {
    var_or(
        "SPOTIFY_API_REDIRECT_URI",
        &format!("http://{}/callback", server_addr()),
    )
}

/// Space separated scopes requested during `plsync auth`.
///
/// The default covers reading private and collaborative playlists on the
/// source side and creating and filling playlists on the destination side.
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

/// Authorization endpoint (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Bind address of the local OAuth callback server.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Number of concurrent track lookups per playlist.
pub fn resolve_workers() -> usize {
    parse_or("PLSYNC_RESOLVE_WORKERS", DEFAULT_RESOLVE_WORKERS).max(1)
}

/// How many suggested queries a single track lookup may follow.
pub fn suggestion_rounds() -> usize {
    parse_or("PLSYNC_SUGGESTION_ROUNDS", DEFAULT_SUGGESTION_ROUNDS)
}
