//! Playlist transfer library.
//!
//! Reads playlists from one music streaming service and recreates them on
//! another. The source adapter lists playlists and their songs, the
//! resolver looks every song up in the destination catalog, and the
//! builder submits the matches as one ordered batch.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local OAuth callback server
//! - `builder` - Ordered chain construction and batch submission
//! - `cli` - Command implementations used by the binary
//! - `config` - Configuration and environment variables
//! - `error` - The [`SyncError`](error::SyncError) taxonomy
//! - `gpm` - Google Play Music adapter
//! - `management` - Cached Spotify login token
//! - `resolver` - Destination catalog search and track selection
//! - `server` - Local HTTP server for OAuth callbacks
//! - `service` - The closed set of supported services
//! - `spotify` - Spotify Web API adapter
//! - `sync` - Single and all playlist orchestration
//! - `types` - Domain model and wire formats
//! - `utils` - Pagination, prompts and PKCE helpers

pub mod api;
pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod gpm;
pub mod management;
pub mod resolver;
pub mod server;
pub mod service;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

/// Result alias used across the crate.
pub type Res<T> = std::result::Result<T, error::SyncError>;

/// Prints an informational message with a blue bullet point.
///
/// ```
/// info!("Listing playlists of {}", user);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the
/// program with status 1.
///
/// Only the binary uses this; library code returns errors instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for failures that are recorded and skipped, like a track that
/// could not be matched.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
