use tabled::Table;

use crate::{
    cli::shared,
    info,
    spotify::SpotifyError,
    types::{ReleaseTableRow, TrackCandidate},
    utils, warning,
};

/// Lists the newest album releases in the user's market.
pub async fn trends(limit: u32, width: u32) {
    let client = shared::connect_spotify().await;

    let pb = utils::spinner("Fetching new releases...");
    let result = client.new_releases(limit).await;
    pb.finish_and_clear();

    let releases = match result {
        Ok(releases) => releases,
        Err(SpotifyError::RateLimited(secs)) => {
            shared::warn_rate_limited(secs);
            return;
        }
        Err(e) => {
            warning!("Error fetching new releases: {}", e);
            return;
        }
    };

    if releases.is_empty() {
        info!("No new releases in market {}.", client.market());
        return;
    }

    info!("New releases in market {}", client.market());

    let dates: Vec<String> = releases.iter().map(|r| r.date.clone()).collect();
    let candidates = releases
        .into_iter()
        .map(|r| TrackCandidate::new(r.name, r.artist).with_image(r.image_url))
        .collect();
    let plan = shared::render_and_settle(candidates, width).await;

    let rows: Vec<ReleaseTableRow> = plan
        .cards
        .iter()
        .zip(dates)
        .map(|(card, date)| ReleaseTableRow {
            date,
            name: card.candidate.title.clone(),
            artist: card.candidate.artist.clone(),
            cover: card.image.label(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
