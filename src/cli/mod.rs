//! # CLI Module
//!
//! Command implementations for moodtune. The CLI plays the part of the
//! display layer: it owns the [`RenderPlan`](crate::recommendation::RenderPlan)
//! of each command, drives the UI loop that receives cover completions, and
//! prints the finished grid as a table.
//!
//! ## Commands
//!
//! - [`auth`] - Spotify OAuth 2.0 PKCE authentication
//! - [`recommend`] - Mood/genre keyword to up to five songs with covers
//! - [`catalog`] - Search tracks, artists and albums
//! - [`trends`] - New releases in the user's market
//! - [`playlist`] - Playlist details and first tracks
//!
//! ## Usage Patterns
//!
//! ```bash
//! moodtune auth
//! moodtune recommend "melancholic acoustic" --covers ./covers
//! moodtune catalog "Red Hot Chili Peppers"
//! moodtune trends --limit 10
//! moodtune playlist https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M
//! ```
//!
//! ## Error Presentation
//!
//! - Missing configuration or Spotify session for commands that need it
//!   terminates with an error message
//! - Request failures print a single warning in place of the results
//! - Covers that fail to load are shown as `Loading…` without further notice

mod auth;
mod catalog;
mod playlist;
mod recommend;
mod shared;
mod trends;

pub use auth::auth;
pub use catalog::catalog;
pub use playlist::playlist;
pub use recommend::recommend;
pub use trends::trends;
