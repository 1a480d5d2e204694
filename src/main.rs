use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use moodtune::{cli, config, error};

/// Window width assumed when none is given, wide enough for three columns.
const DEFAULT_WIDTH: u32 = 800;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Recommend songs for a mood or genre
    Recommend(RecommendOptions),

    /// Search tracks, artists and albums
    Catalog(CatalogOptions),

    /// Show new releases in your market
    Trends(TrendsOptions),

    /// Show playlist details and first tracks
    Playlist(PlaylistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// Mood or genre, e.g. "melancholic acoustic"
    #[clap(num_args = 1.., required = true)]
    keyword: Vec<String>,

    /// Layout width in pixels
    #[clap(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Write loaded covers as PNG into this directory
    #[clap(long)]
    covers: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CatalogOptions {
    /// Search term
    #[clap(num_args = 1.., required = true)]
    query: Vec<String>,

    /// Layout width in pixels
    #[clap(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct TrendsOptions {
    /// Number of releases to show (1-50)
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
    limit: u32,

    /// Layout width in pixels
    #[clap(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Playlist ID or open.spotify.com URL
    playlist: String,

    /// Layout width in pixels
    #[clap(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Recommend(opt) => cli::recommend(opt.keyword.join(" "), opt.width, opt.covers).await,
        Command::Catalog(opt) => cli::catalog(opt.query.join(" "), opt.width).await,
        Command::Trends(opt) => cli::trends(opt.limit, opt.width).await,
        Command::Playlist(opt) => cli::playlist(opt.playlist, opt.width).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
