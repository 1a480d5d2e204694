use std::{path::PathBuf, sync::Arc};

use tabled::Table;

use crate::{
    cli::shared, error,
    gemini::GeminiClient,
    info,
    recommendation::{RecommendationResolver, ResolutionError},
    spotify::SpotifyClient,
    success,
    types::RecommendationTableRow,
    utils, warning,
};

/// Recommends up to five songs for a mood or genre keyword.
///
/// Suggestions come from the generative-text service and are matched against
/// the Spotify catalog for canonical names and covers. Without a Spotify
/// session the suggestions are shown as generated, without covers.
///
/// # Arguments
///
/// * `keyword` - Free-text mood or genre, e.g. "melancholic acoustic"
/// * `width` - Layout width in pixels, drives grid columns and cover size
/// * `covers` - Optional directory to write the loaded covers to as PNG
///
/// # Output
///
/// A table in generation order with the grid cell, title, artist and the
/// cover state: its pixel size, `Loading…` when the download never finished,
/// or `No Image` when the catalog had no match.
pub async fn recommend(keyword: String, width: u32, covers: Option<PathBuf>) {
    if keyword.trim().is_empty() {
        warning!("{}", ResolutionError::EmptyQuery);
        return;
    }

    let generator = match GeminiClient::from_env() {
        Ok(generator) => generator,
        Err(e) => error!("Cannot set up the recommendation service. Err: {}", e),
    };

    let catalog = match SpotifyClient::connect().await {
        Ok(client) => Some(client),
        Err(e) => {
            warning!("Recommendations will come without covers. Err: {}", e);
            None
        }
    };

    let resolver = Arc::new(RecommendationResolver::new(generator, catalog));

    let pb = utils::spinner(&format!("Finding songs for '{}'...", keyword.trim()));
    let outcome = resolver.resolve_in_background(keyword).await;
    pb.finish_and_clear();

    let candidates = match outcome {
        Ok(Ok(candidates)) => candidates,
        Ok(Err(e)) => {
            warning!("{}", e);
            return;
        }
        Err(_) => {
            warning!("Recommendation task ended without a result.");
            return;
        }
    };

    if candidates.is_empty() {
        info!("No recommendations found. Try a different keyword.");
        return;
    }

    let plan = shared::render_and_settle(candidates, width).await;

    let rows: Vec<RecommendationTableRow> = plan
        .cards
        .iter()
        .enumerate()
        .map(|(index, card)| RecommendationTableRow {
            position: index + 1,
            grid: shared::grid_label(&plan, index),
            title: card.candidate.title.clone(),
            artist: card.candidate.artist.clone(),
            cover: card.image.label(),
        })
        .collect();

    println!("{}", Table::new(rows));

    if let Some(dir) = covers {
        match shared::save_covers(&plan, &dir).await {
            Ok(saved) => success!("Saved {} covers to {}", saved, dir.display()),
            Err(e) => warning!("Failed to save covers. Err: {}", e),
        }
    }
}
