use std::{path::Path, sync::Arc, time::Duration};

use image::ImageFormat;

use crate::{
    config, dispatch, error,
    recommendation::{CardImage, ImageCache, RecommendationRenderer, RenderPlan},
    spotify::SpotifyClient,
    types::TrackCandidate,
    utils, warning,
};

/// Extra wait on top of the fetch timeout before pending covers are given up on.
const SETTLE_MARGIN: Duration = Duration::from_secs(1);

pub(crate) async fn connect_spotify() -> SpotifyClient {
    match SpotifyClient::connect().await {
        Ok(client) => client,
        Err(e) => error!("Cannot connect to Spotify. Err: {}", e),
    }
}

pub(crate) fn warn_rate_limited(retry_after: u64) {
    warning!(
        "Spotify is rate limiting requests, retry after {} seconds. Try again later.",
        retry_after
    );
}

/// Renders `candidates` and runs the UI loop until every cover has arrived or
/// the fetch deadline has passed. Covers that never arrive stay pending.
pub(crate) async fn render_and_settle(candidates: Vec<TrackCandidate>, width: u32) -> RenderPlan {
    let (ui, mut ui_loop) = dispatch::channel::<RenderPlan>();
    let mut renderer = match RecommendationRenderer::new(ImageCache::global(), ui, width) {
        Ok(renderer) => renderer,
        Err(e) => error!("Cannot set up cover downloads. Err: {}", e),
    };
    let mut plan = renderer.render(candidates);

    if !plan.is_settled() {
        let pb = utils::spinner("Loading covers...");
        ui_loop
            .pump_until(
                &mut plan,
                config::image_fetch_timeout() + SETTLE_MARGIN,
                RenderPlan::is_settled,
            )
            .await;
        pb.finish_and_clear();
    }

    plan
}

/// Grid cell of the card at `index`, 1-based for display.
pub(crate) fn grid_label(plan: &RenderPlan, index: usize) -> String {
    let (row, column) = plan.position(index);
    format!("r{} c{}", row + 1, column + 1)
}

/// Writes every ready cover of `plan` into `dir` as PNG.
pub(crate) async fn save_covers(plan: &RenderPlan, dir: &Path) -> Result<usize, String> {
    async_fs::create_dir_all(dir)
        .await
        .map_err(|e| e.to_string())?;

    let mut saved = 0;
    for (index, card) in plan.cards.iter().enumerate() {
        let CardImage::Ready(cover) = &card.image else {
            continue;
        };

        let path = dir.join(format!(
            "{:02}-{}.png",
            index + 1,
            utils::slugify(&card.candidate.title)
        ));
        let image = Arc::clone(cover.image());
        tokio::task::spawn_blocking(move || image.save_with_format(&path, ImageFormat::Png))
            .await
            .map_err(|e| e.to_string())?
            .map_err(|e| e.to_string())?;
        saved += 1;
    }

    Ok(saved)
}
