//! Error types for playlist transfers.

use thiserror::Error;

use crate::types::Song;

/// Everything that can go wrong while moving playlists between services.
///
/// [`SyncError::Auth`], [`SyncError::PlaylistNotFound`] and
/// [`SyncError::Listing`] halt a whole run (see [`SyncError::is_fatal`]).
/// Per-track variants are collected into reports instead of aborting
/// sibling work, and a finished run folds them into one
/// [`SyncError::PartialBatch`].
#[derive(Error, Debug)]
pub enum SyncError {
    /// Login or credential failure
    #[error("Authentication with {service} failed: {message}")]
    Auth { service: String, message: String },

    /// Network failure or non-success HTTP status
    #[error("{}", transport_message(.path, .status, .message))]
    Transport {
        path: String,
        status: Option<u16>,
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Failed to parse response from {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    /// The source playlist listing could not be read
    #[error("Cannot list playlists on {service}: {source}")]
    Listing {
        service: &'static str,
        source: Box<SyncError>,
    },

    #[error("No matching track found for {song}")]
    TrackNotFound { song: Song },

    /// The service kept suggesting new queries past the configured bound
    #[error("Search for {song} did not settle after {rounds} suggested queries")]
    AmbiguousQuery { song: Song, rounds: usize },

    /// A single entry of a batch came back with a non-OK code
    #[error("Failed to add track {track_id}: {code}")]
    Rejected { track_id: String, code: String },

    #[error("{} failures while {context}", .errors.len())]
    PartialBatch {
        context: String,
        errors: Vec<SyncError>,
    },

    #[error("{service} does not support {operation}")]
    Unsupported {
        service: &'static str,
        operation: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl SyncError {
    /// Whether this error has to stop the whole run.
    ///
    /// These are exactly the errors [`crate::sync::Syncer::run`] returns as
    /// `Err`: a failed login, an unknown playlist name in single mode and an
    /// unreadable source listing. Everything else ends up in the report.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SyncError::Auth { .. } | SyncError::PlaylistNotFound(_) | SyncError::Listing { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SyncError::PlaylistNotFound(_) | SyncError::TrackNotFound { .. }
        )
    }

    pub(crate) fn listing(service: &'static str, err: SyncError) -> Self {
        SyncError::Listing {
            service,
            source: Box::new(err),
        }
    }

    pub(crate) fn auth(service: impl Into<String>, message: impl Into<String>) -> Self {
        SyncError::Auth {
            service: service.into(),
            message: message.into(),
        }
    }

    pub(crate) fn parse(path: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SyncError::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn request(path: impl Into<String>, err: reqwest::Error) -> Self {
        SyncError::Transport {
            path: path.into(),
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn transport_message(path: &str, status: &Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("Request to {path} failed with status {status}: {message}"),
        None => format!("Request to {path} failed: {message}"),
    }
}
