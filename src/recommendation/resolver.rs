use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::{
    Res,
    recommendation::errors::{GenerationError, ResolutionError},
    types::{CatalogTrack, TrackCandidate},
};

/// Upper bound on the candidates a single resolution returns.
pub const MAX_CANDIDATES: usize = 5;

/// Produces free-text song suggestions for a keyword.
///
/// The returned text is newline-delimited, each line ideally formatted as
/// `"Title - Artist"`.
#[async_trait]
pub trait SongGenerator: Send + Sync {
    async fn suggest(&self, keyword: &str) -> Result<String, GenerationError>;
}

/// Structured `track:<title> artist:<artist>` lookup returning the first hit.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    async fn lookup_track(&self, title: &str, artist: &str) -> Res<Option<CatalogTrack>>;
}

/// No catalog session behaves like a catalog that never finds anything.
#[async_trait]
impl<T: TrackCatalog> TrackCatalog for Option<T> {
    async fn lookup_track(&self, title: &str, artist: &str) -> Res<Option<CatalogTrack>> {
        match self {
            Some(catalog) => catalog.lookup_track(title, artist).await,
            None => Ok(None),
        }
    }
}

/// Turns a free-text query into at most [`MAX_CANDIDATES`] displayable tracks.
///
/// Resolution runs in two stages:
///
/// 1. The generator is asked for songs matching the keyword and its output
///    is parsed line by line (see [`parse_suggestion`]). A generator failure
///    aborts with [`ResolutionError::GenerationFailed`]; it is not retried.
/// 2. Every parsed pair is looked up once in the catalog. A hit replaces
///    title and artist with the catalog's values and contributes the cover
///    URL. A miss or a lookup error keeps the generated pair without a cover.
///
/// Output order is generation order. Nothing is re-ranked or deduplicated.
pub struct RecommendationResolver<G, C> {
    generator: G,
    catalog: C,
}

impl<G, C> RecommendationResolver<G, C>
where
    G: SongGenerator,
    C: TrackCatalog,
{
    pub fn new(generator: G, catalog: C) -> Self {
        Self { generator, catalog }
    }

    pub async fn resolve(&self, query: &str) -> Result<Vec<TrackCandidate>, ResolutionError> {
        let keyword = query.trim();
        if keyword.is_empty() {
            return Err(ResolutionError::EmptyQuery);
        }

        let text = self.generator.suggest(keyword).await?;
        let suggestions = parse_suggestions(&text);

        let mut candidates = Vec::with_capacity(suggestions.len().min(MAX_CANDIDATES));
        for (title, artist) in suggestions.into_iter().take(MAX_CANDIDATES) {
            candidates.push(self.cross_reference(title, artist).await);
        }

        Ok(candidates)
    }

    async fn cross_reference(&self, title: String, artist: String) -> TrackCandidate {
        match self.catalog.lookup_track(&title, &artist).await {
            Ok(Some(hit)) => TrackCandidate {
                title: canonical_or(hit.title, title),
                artist: canonical_or(hit.artist, artist),
                image_url: hit.image_url,
            },
            Ok(None) | Err(_) => TrackCandidate::new(title, artist),
        }
    }
}

impl<G, C> RecommendationResolver<G, C>
where
    G: SongGenerator + 'static,
    C: TrackCatalog + 'static,
{
    /// Runs [`resolve`](Self::resolve) on a worker task.
    ///
    /// The caller keeps its own loop responsive and awaits the receiver for
    /// the outcome. A dropped receiver simply discards the result.
    pub fn resolve_in_background(
        self: Arc<Self>,
        query: String,
    ) -> oneshot::Receiver<Result<Vec<TrackCandidate>, ResolutionError>> {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let result = self.resolve(&query).await;
            let _ = tx.send(result);
        });
        rx
    }
}

fn canonical_or(canonical: String, generated: String) -> String {
    let canonical = canonical.trim();
    if canonical.is_empty() {
        generated
    } else {
        canonical.to_string()
    }
}

/// Parses every line of generator output, dropping unrecognized lines.
pub fn parse_suggestions(text: &str) -> Vec<(String, String)> {
    text.lines().filter_map(parse_suggestion).collect()
}

/// Parses one `"Title - Artist"` or `"Title by Artist"` line.
///
/// List markers (`-`, `*`, `•`, `1.`, `1)`), Markdown bold markers and quotes
/// around either part are ignored. `" - "` wins over `" by "` and both split
/// at their first occurrence. Lines with neither separator, or with an empty
/// side, yield `None`.
pub fn parse_suggestion(line: &str) -> Option<(String, String)> {
    let cleaned = line.replace("**", "");
    let cleaned = strip_list_marker(&cleaned);

    let (title, artist) = cleaned
        .split_once(" - ")
        .or_else(|| cleaned.split_once(" by "))?;

    let title = clean_part(title);
    let artist = clean_part(artist);
    if title.is_empty() || artist.is_empty() {
        return None;
    }

    Some((title, artist))
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim_start();
        }
    }

    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.trim_start();
        }
    }

    line
}

fn clean_part(part: &str) -> String {
    part.trim().trim_matches('"').trim().to_string()
}
