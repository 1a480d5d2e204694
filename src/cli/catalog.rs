use tabled::Table;

use crate::{
    cli::shared,
    info,
    spotify::SpotifyError,
    types::{CatalogCategory, CatalogTableRow},
    utils, warning,
};

/// Results shown per category.
const RESULTS_PER_CATEGORY: u32 = 5;

/// Searches tracks, artists and albums and lists them with their covers.
pub async fn catalog(query: String, width: u32) {
    if query.trim().is_empty() {
        warning!("Please enter a search term.");
        return;
    }

    let client = shared::connect_spotify().await;

    let pb = utils::spinner("Searching catalog...");
    let result = client.search_catalog(&query, RESULTS_PER_CATEGORY).await;
    pb.finish_and_clear();

    let entries = match result {
        Ok(entries) => entries,
        Err(SpotifyError::RateLimited(secs)) => {
            shared::warn_rate_limited(secs);
            return;
        }
        Err(e) => {
            warning!("Spotify API Error: {}", e);
            return;
        }
    };

    if entries.is_empty() {
        info!("No results found. Try a different search.");
        return;
    }

    let categories: Vec<CatalogCategory> = entries.iter().map(|e| e.category).collect();
    let plan =
        shared::render_and_settle(entries.into_iter().map(|e| e.candidate).collect(), width).await;

    let rows: Vec<CatalogTableRow> = plan
        .cards
        .iter()
        .zip(categories)
        .map(|(card, category)| CatalogTableRow {
            category: category.to_string(),
            name: card.candidate.title.clone(),
            detail: match category {
                CatalogCategory::Artist => card.candidate.artist.clone(),
                _ => format!("by {}", card.candidate.artist),
            },
            cover: card.image.label(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
