//! Configuration management for moodtune.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, the generative-text service
//! key, server settings, and cover art tuning.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Required settings are exposed as `Result<String, String>` getters so that a
//! missing value surfaces as a readable message instead of a panic.

use std::{env, path::PathBuf, time::Duration};

const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_IMAGE_FETCH_TIMEOUT_SECS: u64 = 5;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the `moodtune` data directory if it doesn't exist yet and loads the
/// `.env` file inside it when present. A missing file is not an error: every
/// setting can also come from the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/moodtune/.env`
/// - macOS: `~/Library/Application Support/moodtune/.env`
/// - Windows: `%LOCALAPPDATA%/moodtune/.env`
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the `.env`
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the platform-specific data directory used by moodtune.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("moodtune");
    path
}

fn required(key: &str) -> Result<String, String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("{} must be set", key)),
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Returns the address for the local OAuth callback server (`SERVER_ADDRESS`).
///
/// # Example
///
/// ```
/// let addr = server_addr()?; // e.g., "127.0.0.1:8888"
/// ```
pub fn server_addr() -> Result<String, String> {
    required("SERVER_ADDRESS")
}

/// Returns the Spotify API client ID (`SPOTIFY_API_AUTH_CLIENT_ID`).
pub fn spotify_client_id() -> Result<String, String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Returns the Spotify OAuth redirect URI (`SPOTIFY_API_REDIRECT_URI`).
///
/// Must match the redirect URI registered in the Spotify application settings.
pub fn spotify_redirect_uri() -> Result<String, String> {
    required("SPOTIFY_API_REDIRECT_URI")
}

/// Returns the OAuth scope requested during authentication (`SPOTIFY_API_AUTH_SCOPE`).
///
/// # Example
///
/// ```
/// let scope = spotify_scope()?; // e.g., "user-read-private playlist-read-private"
/// ```
pub fn spotify_scope() -> Result<String, String> {
    required("SPOTIFY_API_AUTH_SCOPE")
}

/// Returns the Spotify OAuth authorization URL (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> Result<String, String> {
    required("SPOTIFY_API_AUTH_URL")
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> Result<String, String> {
    required("SPOTIFY_API_URL").map(|url| url.trim_end_matches('/').to_string())
}

/// Returns the Spotify OAuth token exchange URL (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> Result<String, String> {
    required("SPOTIFY_API_TOKEN_URL")
}

/// Returns the market override (`SPOTIFY_MARKET`), if any.
///
/// When unset the market is taken from the authenticated user's profile.
pub fn spotify_market() -> Option<String> {
    optional("SPOTIFY_MARKET").map(|m| m.trim().to_uppercase())
}

/// Returns the generative-text API key (`GEMINI_API_KEY`).
///
/// # Security Note
///
/// The key should be kept out of logs and version control.
pub fn gemini_api_key() -> Result<String, String> {
    required("GEMINI_API_KEY")
}

/// Returns the generative-text API base URL (`GEMINI_API_URL`).
pub fn gemini_api_url() -> String {
    optional("GEMINI_API_URL")
        .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Returns the generative model name (`GEMINI_MODEL`).
pub fn gemini_model() -> String {
    optional("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string())
}

/// Returns the per-request timeout for cover downloads (`IMAGE_FETCH_TIMEOUT_SECS`).
///
/// Defaults to 5 seconds; unparsable values fall back to the default.
pub fn image_fetch_timeout() -> Duration {
    let secs = optional("IMAGE_FETCH_TIMEOUT_SECS")
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_IMAGE_FETCH_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Returns the image cache bound (`IMAGE_CACHE_MAX_ENTRIES`).
///
/// `None` keeps the cache unbounded.
pub fn image_cache_max_entries() -> Option<usize> {
    optional("IMAGE_CACHE_MAX_ENTRIES")
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|max| *max > 0)
}
