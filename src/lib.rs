//! Moodtune Library
//!
//! This library turns a free-text mood or genre into a short list of song
//! recommendations. Suggestions come from a generative-text model, are
//! cross-referenced against the Spotify catalog for canonical titles and cover
//! art, and are shaped into a display grid whose covers load in the background.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `dispatch` - Message passing between background tasks and the UI loop
//! - `gemini` - Generative-text client producing song suggestions
//! - `management` - Token cache management
//! - `recommendation` - Resolver, image cache, image fetcher and renderer
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use moodtune::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> moodtune::Res<()> {
//!     config::load_env().await?;
//!     cli::recommend("melancholic acoustic".to_string(), 800, None).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod gemini;
pub mod management;
pub mod recommendation;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Uses a boxed dynamic error trait object with `Send + Sync` bounds so it
/// can cross task boundaries in async contexts.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Asking for songs matching '{}'", keyword);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for unrecoverable errors: the process terminates with exit
/// code 1 right after printing.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems the user should know about, such as a
/// missing Spotify session that leaves recommendations without covers.
///
/// # Example
///
/// ```
/// warning!("No Spotify session found, covers will be unavailable");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
