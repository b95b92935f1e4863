use std::path::PathBuf;

use chrono::Utc;

use crate::{Res, config, error::SyncError, spotify, types::Token, warning};

/// Seconds before expiry at which a cached token is refreshed.
const REFRESH_MARGIN: u64 = 240;

/// Spotify login token cached by `plsync auth`.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Res<Self> {
        let content = async_fs::read_to_string(Self::token_path()).await?;
        let token: Token = serde_json::from_str(&content)
            .map_err(|e| SyncError::Config(format!("corrupt token cache: {}", e)))?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Res<()> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)
            .map_err(|e| SyncError::Config(e.to_string()))?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Returns the access token, refreshing and re-persisting it first when
    /// it is about to expire. A failed refresh keeps the old token; the
    /// login check that follows reports it.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            match spotify::auth::refresh_token(&self.token.refresh_token).await {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        warning!("Failed to cache refreshed token: {}", e);
                    }
                }
                Err(e) => warning!("Failed to refresh Spotify token: {}", e),
            }
        }

        self.token.access_token.clone()
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + REFRESH_MARGIN >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}
