//! # API Module
//!
//! HTTP endpoints served by the temporary local server during `moodtune auth`.
//!
//! - [`callback`] - Receives Spotify's OAuth redirect and completes the PKCE
//!   exchange by trading the authorization code for an access token.
//! - [`health`] - Returns status and version information.
//!
//! Both handlers are wired into an axum [`Router`](axum::Router) by
//! [`crate::server::router`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
