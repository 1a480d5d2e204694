use reqwest::StatusCode;
use tabled::Table;

use crate::{
    cli::shared, info,
    spotify::SpotifyError,
    types::PlaylistTrackRow,
    utils, warning,
};

/// Shows a playlist's details and its first tracks.
///
/// # Arguments
///
/// * `playlist` - A playlist ID or an `open.spotify.com/playlist/...` URL
/// * `width` - Layout width in pixels, drives the cover size
pub async fn playlist(playlist: String, width: u32) {
    let Some(playlist_id) = utils::extract_playlist_id(&playlist) else {
        warning!("Please enter a playlist ID or URL.");
        return;
    };

    let client = shared::connect_spotify().await;

    let pb = utils::spinner("Fetching playlist...");
    let result = client.playlist(&playlist_id).await;
    pb.finish_and_clear();

    let summary = match result {
        Ok(summary) => summary,
        Err(SpotifyError::Http(e)) if e.status() == Some(StatusCode::NOT_FOUND) => {
            warning!("Playlist not found.");
            return;
        }
        Err(SpotifyError::RateLimited(secs)) => {
            shared::warn_rate_limited(secs);
            return;
        }
        Err(e) => {
            warning!("Spotify API Error: {}", e);
            return;
        }
    };

    info!("Playlist: {}", summary.name);
    info!("Owner: {}", summary.owner);
    info!("Description: {}", summary.description);
    info!("Total tracks: {}", summary.total_tracks);

    let plan = shared::render_and_settle(summary.tracks, width).await;

    let rows: Vec<PlaylistTrackRow> = plan
        .cards
        .iter()
        .enumerate()
        .map(|(index, card)| PlaylistTrackRow {
            position: index + 1,
            title: card.candidate.title.clone(),
            artist: card.candidate.artist.clone(),
            cover: card.image.label(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
