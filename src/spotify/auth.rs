use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    Res, config,
    error::SyncError,
    info,
    management::TokenManager,
    server::start_api_server,
    service::read_json,
    types::{Credential, PkceToken, Token, TokenResponse},
    utils, warning,
};

use super::SpotifyClient;

const SPOTIFY: &str = "Spotify";

impl SpotifyClient {
    /// Obtains a credential for a sync run.
    ///
    /// The token is taken from the first available of:
    /// 1. `SPOTIFY_OAUTH_TOKEN`
    /// 2. the token cached by `plsync auth` (refreshed when close to expiry)
    /// 3. a token pasted at the prompt
    ///
    /// The token is then checked against `GET /me`, which also yields the
    /// user id that playlist listing and creation are scoped to.
    pub async fn authenticate(&self) -> Res<Credential> {
        let token = match config::spotify_token() {
            Some(token) => token,
            None => match TokenManager::load().await {
                Ok(mut manager) => manager.get_valid_token().await,
                Err(_) => prompt_for_token()?,
            },
        };

        if token.is_empty() {
            return Err(SyncError::auth(SPOTIFY, "no OAuth token provided"));
        }

        let user = self
            .current_user(&Credential::new(token.clone()))
            .await
            .map_err(|e| SyncError::auth(SPOTIFY, format!("failed to get current user: {}", e)))?;

        info!(
            "Welcome to Spotify {}",
            user.display_name.as_deref().unwrap_or(&user.id)
        );
        Ok(Credential::with_user(token, user.id))
    }
}

fn prompt_for_token() -> Res<String> {
    info!(
        "Enter a Spotify OAuth token (or run `plsync auth` once).\n    Required scopes: playlist-read-private, playlist-read-collaborative, playlist-modify-public, user-read-private"
    );
    utils::prompt("Token:").map_err(|e| SyncError::auth(SPOTIFY, e.to_string()))
}

/// Runs the OAuth 2.0 PKCE flow and caches the resulting token.
///
/// 1. Generates a code verifier and its S256 challenge
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the browser
/// 4. Waits up to 60 seconds for the callback to deliver a token
/// 5. Persists the token through [`TokenManager`]
pub async fn authorize(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Res<()> {
    let client_id = config::spotify_client_id()?;
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = &config::spotify_apiauth_url(),
        client_id = client_id,
        redirect_uri = &config::spotify_redirect_uri(),
        code_challenge = code_challenge,
        scope = &config::spotify_scope().replace(' ', "%20")
    );

    // Store verifier before the redirect can come back
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier: code_verifier.clone(),
            token: None,
        });
    }

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(shared_state).await {
        Some(token) => TokenManager::new(token).persist().await,
        None => Err(SyncError::auth(SPOTIFY, "authorization timed out")),
    }
}

/// Polls the shared state once per second for up to 60 seconds.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code and the PKCE verifier for a token.
pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Res<Token> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri();

    request_token(&[
        ("grant_type", "authorization_code"),
        ("client_id", &client_id),
        ("code", code),
        ("code_verifier", verifier),
        ("redirect_uri", &redirect_uri),
    ])
    .await
    .map(|res| into_token(res, None))
}

/// Trades a refresh token for a fresh access token.
///
/// Spotify may rotate the refresh token; when it does not send a new one
/// the old one stays valid and is kept.
pub async fn refresh_token(refresh_token: &str) -> Res<Token> {
    let client_id = config::spotify_client_id()?;

    request_token(&[
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", &client_id),
    ])
    .await
    .map(|res| into_token(res, Some(refresh_token)))
}

async fn request_token(form: &[(&str, &str)]) -> Res<TokenResponse> {
    let token_url = config::spotify_apitoken_url();
    let response = Client::new()
        .post(&token_url)
        .form(form)
        .send()
        .await
        .map_err(|e| SyncError::request(&token_url, e))?;

    read_json(&token_url, response)
        .await
        .map_err(|e| SyncError::auth(SPOTIFY, e.to_string()))
}

fn into_token(res: TokenResponse, previous_refresh: Option<&str>) -> Token {
    Token {
        access_token: res.access_token,
        refresh_token: res
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default(),
        scope: res.scope,
        expires_in: res.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
