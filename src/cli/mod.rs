//! # CLI Module
//!
//! Command implementations behind the `plsync` binary. Each function owns
//! the user interaction of one command (logins, progress and the final
//! report) and delegates the work to [`crate::sync`] and the service
//! adapters.
//!
//! - [`sync`] - Logs in to both services and transfers playlists
//! - [`auth`] - Runs the Spotify PKCE login and caches the token
//!
//! ```bash
//! plsync auth
//! plsync --source spotify --destination gpm --playlist "Road Trip"
//! plsync --source spotify --destination gpm --playlist --all --workers 8
//! ```

mod auth;
mod sync;

pub use auth::auth;
pub use sync::print_report;
pub use sync::sync;
