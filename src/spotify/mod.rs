//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by moodtune.
//! It covers authentication, the structured track lookup that backs the
//! recommendation cross-reference, catalog search, new releases and playlist
//! inspection.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Recommendation pipeline)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     ├── Search (structured track lookup, catalog search)
//!     ├── Browse (new releases)
//!     ├── Playlist (playlist details)
//!     └── User (profile, market)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Client
//!
//! [`SpotifyClient`] bundles the HTTP client, the API base URL, the market all
//! requests are scoped to, and the shared [`TokenManager`]. Endpoint helpers
//! live in the submodules as additional `impl SpotifyClient` blocks.
//!
//! ## Error Handling
//!
//! - **502 Bad Gateway**: retried after a 10 second pause, up to 3 times
//! - **429 Too Many Requests**: waits for `Retry-After` when it is at most
//!   120 seconds, otherwise gives up with [`SpotifyError::RateLimited`]
//! - The per-suggestion track lookup never retries; a 502 or 429 there just
//!   costs that suggestion its cover
//! - Nothing is printed here; commands decide what to tell the user
//! - Everything else is surfaced as [`SpotifyError::Http`]
//!
//! ## API Coverage
//!
//! - `GET /search` - Structured track lookup and catalog search
//! - `GET /browse/new-releases` - New album releases for a market
//! - `GET /playlists/{id}` - Playlist details with tracks
//! - `GET /me` - Current user profile (market detection)
//! - `POST /api/token` - Token exchange and refresh operations

use std::{fmt, sync::Arc, time::Duration};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::sleep};

use crate::{config, management::TokenManager};

pub mod auth;
pub mod browse;
pub mod playlist;
pub mod search;
pub mod user;

pub const DEFAULT_MARKET: &str = "US";

const MAX_RETRIES: u32 = 3;
const BAD_GATEWAY_BACKOFF: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 120;

#[derive(Debug)]
pub enum SpotifyError {
    Http(reqwest::Error),
    RateLimited(u64),
    Config(String),
    Auth(String),
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::Http(e) => write!(f, "{}", e),
            SpotifyError::RateLimited(secs) => {
                write!(f, "rate limited, retry after {} seconds", secs)
            }
            SpotifyError::Config(msg) => write!(f, "configuration error: {}", msg),
            SpotifyError::Auth(msg) => {
                write!(f, "not authenticated ({}). Please run moodtune auth", msg)
            }
        }
    }
}

impl std::error::Error for SpotifyError {}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::Http(err)
    }
}

#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    market: String,
    tokens: Arc<Mutex<TokenManager>>,
}

impl SpotifyClient {
    /// Builds a client from the cached token and resolves the market.
    ///
    /// The market comes from `SPOTIFY_MARKET` when set, otherwise from the
    /// user's profile country, falling back to [`DEFAULT_MARKET`].
    pub async fn connect() -> Result<Self, SpotifyError> {
        let tokens = TokenManager::load().await.map_err(SpotifyError::Auth)?;
        let api_url = config::spotify_apiurl().map_err(SpotifyError::Config)?;

        let mut client = Self::new(api_url, tokens, DEFAULT_MARKET.to_string());
        client.market = match config::spotify_market() {
            Some(market) => market,
            None => client
                .current_user()
                .await
                .ok()
                .and_then(|user| user.country)
                .unwrap_or_else(|| DEFAULT_MARKET.to_string()),
        };
        Ok(client)
    }

    pub fn new(api_url: String, tokens: TokenManager, market: String) -> Self {
        Self {
            http: Client::new(),
            api_url,
            market,
            tokens: Arc::new(Mutex::new(tokens)),
        }
    }

    pub fn market(&self) -> &str {
        &self.market
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SpotifyError> {
        self.get_json_with_retries(path, query, MAX_RETRIES).await
    }

    /// Like [`get_json`](Self::get_json) but gives up on the first 502 or
    /// 429. Used where a failure only costs one item and must not stall.
    pub(crate) async fn get_json_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SpotifyError> {
        self.get_json_with_retries(path, query, 0).await
    }

    async fn get_json_with_retries<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        max_retries: u32,
    ) -> Result<T, SpotifyError> {
        let api_url = format!("{uri}{path}", uri = self.api_url, path = path);
        let mut attempts = 0;

        loop {
            let token = self.tokens.lock().await.get_valid_token().await;
            let response = self
                .http
                .get(&api_url)
                .query(query)
                .bearer_auth(token)
                .send()
                .await?;

            match response.status() {
                StatusCode::BAD_GATEWAY if attempts < max_retries => {
                    attempts += 1;
                    sleep(BAD_GATEWAY_BACKOFF).await;
                    continue;
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(1);
                    if attempts >= max_retries || retry_after > MAX_RETRY_AFTER_SECS {
                        return Err(SpotifyError::RateLimited(retry_after));
                    }
                    attempts += 1;
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                _ => {}
            }

            let json = response.error_for_status()?.json::<T>().await?;
            return Ok(json);
        }
    }
}
