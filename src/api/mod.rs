//! # API Module
//!
//! HTTP endpoints of the short-lived local server started by `plsync auth`.
//!
//! - [`callback`] - Redirect target of the Spotify authorization page;
//!   exchanges the authorization code for a token using the PKCE verifier.
//! - [`health`] - Liveness probe returning the crate version.
//!
//! The server only runs while the PKCE flow waits for the browser, see
//! [`crate::server::start_api_server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
