use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use moodtune::{
    Res, dispatch,
    recommendation::{
        AsyncImageFetcher, CachedImage, CardImage, GenerationError, ImageCache, MAX_CANDIDATES,
        RecommendationRenderer, RecommendationResolver, ResolutionError, SongGenerator,
        TrackCatalog,
        resolver::{parse_suggestion, parse_suggestions},
    },
    types::{CatalogTrack, TrackCandidate},
};

struct FakeGenerator {
    reply: Result<String, GenerationError>,
    calls: Arc<AtomicUsize>,
}

impl FakeGenerator {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(err: GenerationError) -> Self {
        Self {
            reply: Err(err),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl SongGenerator for FakeGenerator {
    async fn suggest(&self, _keyword: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

/// Answers lookups from a fixed table keyed by generated title.
#[derive(Default)]
struct FakeCatalog {
    hits: Vec<(&'static str, CatalogTrack)>,
    failing_titles: Vec<&'static str>,
    lookups: Arc<Mutex<Vec<(String, String)>>>,
}

#[async_trait]
impl TrackCatalog for FakeCatalog {
    async fn lookup_track(&self, title: &str, artist: &str) -> Res<Option<CatalogTrack>> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push((title.to_string(), artist.to_string()));
        }
        if self.failing_titles.iter().any(|failing| *failing == title) {
            return Err("catalog unavailable".into());
        }
        Ok(self
            .hits
            .iter()
            .find(|(generated, _)| *generated == title)
            .map(|(_, hit)| hit.clone()))
    }
}

fn hit(title: &str, artist: &str, image_url: Option<&str>) -> CatalogTrack {
    CatalogTrack {
        title: title.to_string(),
        artist: artist.to_string(),
        image_url: image_url.map(str::to_string),
    }
}

#[test]
fn test_parse_suggestion_separators() {
    assert_eq!(
        parse_suggestion("Skinny Love - Bon Iver"),
        Some(("Skinny Love".to_string(), "Bon Iver".to_string()))
    );
    assert_eq!(
        parse_suggestion("Holocene by Bon Iver"),
        Some(("Holocene".to_string(), "Bon Iver".to_string()))
    );

    // " - " wins over " by " even when " by " comes first
    assert_eq!(
        parse_suggestion("Stand by Me - Ben E. King"),
        Some(("Stand by Me".to_string(), "Ben E. King".to_string()))
    );

    // Split happens at the first separator only
    assert_eq!(
        parse_suggestion("Title - Artist - Remastered"),
        Some(("Title".to_string(), "Artist - Remastered".to_string()))
    );
}

#[test]
fn test_parse_suggestion_cleans_decorations() {
    assert_eq!(
        parse_suggestion("1. \"Skinny Love\" - Bon Iver"),
        Some(("Skinny Love".to_string(), "Bon Iver".to_string()))
    );
    assert_eq!(
        parse_suggestion("- **Holocene** - **Bon Iver**"),
        Some(("Holocene".to_string(), "Bon Iver".to_string()))
    );
    assert_eq!(
        parse_suggestion("* Fast Car - Tracy Chapman"),
        Some(("Fast Car".to_string(), "Tracy Chapman".to_string()))
    );
    assert_eq!(
        parse_suggestion("3) Hurt - Johnny Cash  "),
        Some(("Hurt".to_string(), "Johnny Cash".to_string()))
    );
}

#[test]
fn test_parse_suggestion_rejects_unusable_lines() {
    assert_eq!(parse_suggestion(""), None);
    assert_eq!(parse_suggestion("Here are some songs you might like:"), None);
    assert_eq!(parse_suggestion("Title-Artist"), None);
    assert_eq!(parse_suggestion(" - Bon Iver"), None);
    assert_eq!(parse_suggestion("Skinny Love - "), None);
}

#[test]
fn test_parse_suggestions_keeps_order_and_skips_garbage() {
    let text = "Sure! Here you go:\n\nA - B\nnot a song\nC by D\n";
    assert_eq!(
        parse_suggestions(text),
        vec![
            ("A".to_string(), "B".to_string()),
            ("C".to_string(), "D".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_empty_query_makes_no_calls() {
    let generator = FakeGenerator::replying("A - B");
    let generator_calls = Arc::clone(&generator.calls);
    let catalog = FakeCatalog::default();
    let lookups = Arc::clone(&catalog.lookups);
    let resolver = RecommendationResolver::new(generator, catalog);

    assert_eq!(resolver.resolve("").await, Err(ResolutionError::EmptyQuery));
    assert_eq!(resolver.resolve("   \t ").await, Err(ResolutionError::EmptyQuery));

    assert_eq!(generator_calls.load(Ordering::SeqCst), 0);
    assert!(lookups.lock().map(|l| l.is_empty()).unwrap_or(false));
    assert_eq!(
        ResolutionError::EmptyQuery.to_string(),
        "Please enter a keyword to search for music."
    );
}

#[tokio::test]
async fn test_mixed_separators_and_garbage() {
    let generator = FakeGenerator::replying("A - B\ngarbage line\nC by D");
    let catalog = FakeCatalog {
        hits: vec![("A", hit("A", "B", Some("https://img/a.jpg")))],
        ..Default::default()
    };
    let lookups = Arc::clone(&catalog.lookups);
    let resolver = RecommendationResolver::new(generator, catalog);

    let candidates = resolver.resolve("indie").await.unwrap();

    assert_eq!(
        candidates,
        vec![
            TrackCandidate::new("A", "B").with_image(Some("https://img/a.jpg".to_string())),
            TrackCandidate::new("C", "D"),
        ]
    );

    // One lookup per parsed pair, none for the garbage line
    let lookups = lookups.lock().unwrap().clone();
    assert_eq!(
        lookups,
        vec![
            ("A".to_string(), "B".to_string()),
            ("C".to_string(), "D".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_at_most_five_candidates_and_lookups() {
    let text = (1..=8)
        .map(|i| format!("Song {} - Artist {}", i, i))
        .collect::<Vec<_>>()
        .join("\n");
    let generator = FakeGenerator::replying(&text);
    let catalog = FakeCatalog::default();
    let lookups = Arc::clone(&catalog.lookups);
    let resolver = RecommendationResolver::new(generator, catalog);

    let candidates = resolver.resolve("party").await.unwrap();

    assert_eq!(candidates.len(), MAX_CANDIDATES);
    assert_eq!(candidates[0].title, "Song 1");
    assert_eq!(candidates[4].title, "Song 5");
    assert_eq!(lookups.lock().unwrap().len(), MAX_CANDIDATES);
}

#[tokio::test]
async fn test_catalog_error_keeps_generated_values() {
    let generator = FakeGenerator::replying("A - B\nC - D");
    let catalog = FakeCatalog {
        hits: vec![("C", hit("C (Remastered)", "D", Some("https://img/c.jpg")))],
        failing_titles: vec!["A"],
        ..Default::default()
    };
    let resolver = RecommendationResolver::new(generator, catalog);

    let candidates = resolver.resolve("rock").await.unwrap();

    assert_eq!(candidates[0], TrackCandidate::new("A", "B"));
    assert_eq!(candidates[1].title, "C (Remastered)");
    assert_eq!(candidates[1].image_url.as_deref(), Some("https://img/c.jpg"));
}

#[tokio::test]
async fn test_catalog_values_replace_generated_ones() {
    let generator = FakeGenerator::replying("skinny love - bon iver");
    let catalog = FakeCatalog {
        hits: vec![("skinny love", hit("Skinny Love", "Bon Iver", None))],
        ..Default::default()
    };
    let resolver = RecommendationResolver::new(generator, catalog);

    let candidates = resolver.resolve("folk").await.unwrap();

    // Canonical casing wins even when it only differs in case, and a hit
    // without a cover still yields no image URL
    assert_eq!(candidates, vec![TrackCandidate::new("Skinny Love", "Bon Iver")]);
}

#[tokio::test]
async fn test_blank_catalog_values_fall_back_to_generated() {
    let generator = FakeGenerator::replying("A - B");
    let catalog = FakeCatalog {
        hits: vec![("A", hit("  ", "", Some("https://img/a.jpg")))],
        ..Default::default()
    };
    let resolver = RecommendationResolver::new(generator, catalog);

    let candidates = resolver.resolve("jazz").await.unwrap();

    assert_eq!(
        candidates,
        vec![TrackCandidate::new("A", "B").with_image(Some("https://img/a.jpg".to_string()))]
    );
}

#[tokio::test]
async fn test_generation_failure_is_reported() {
    let generator = FakeGenerator::failing(GenerationError::Quota("limit reached".to_string()));
    let catalog = FakeCatalog::default();
    let lookups = Arc::clone(&catalog.lookups);
    let resolver = RecommendationResolver::new(generator, catalog);

    let err = resolver.resolve("blues").await.unwrap_err();

    assert!(matches!(err, ResolutionError::GenerationFailed(_)));
    assert!(err.to_string().starts_with("Gemini API Error: "));
    assert!(err.to_string().contains("limit reached"));
    assert!(lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_generation_yields_no_candidates() {
    let resolver = RecommendationResolver::new(FakeGenerator::replying(""), FakeCatalog::default());
    assert_eq!(resolver.resolve("nothing").await, Ok(vec![]));

    let resolver = RecommendationResolver::new(
        FakeGenerator::replying("I cannot help with that."),
        FakeCatalog::default(),
    );
    assert_eq!(resolver.resolve("nothing").await, Ok(vec![]));
}

#[tokio::test]
async fn test_missing_catalog_keeps_suggestions() {
    let resolver = RecommendationResolver::new(
        FakeGenerator::replying("A - B\nC by D"),
        None::<FakeCatalog>,
    );

    let candidates = resolver.resolve("ambient").await.unwrap();

    assert_eq!(
        candidates,
        vec![TrackCandidate::new("A", "B"), TrackCandidate::new("C", "D")]
    );
}

#[tokio::test]
async fn test_resolve_in_background() {
    let generator = FakeGenerator::replying("A - B");
    let calls = Arc::clone(&generator.calls);
    let resolver = Arc::new(RecommendationResolver::new(generator, FakeCatalog::default()));

    let outcome = Arc::clone(&resolver)
        .resolve_in_background("  lo-fi  ".to_string())
        .await
        .unwrap();

    assert_eq!(outcome, Ok(vec![TrackCandidate::new("A", "B")]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let outcome = resolver.resolve_in_background(String::new()).await.unwrap();
    assert_eq!(outcome, Err(ResolutionError::EmptyQuery));
}

#[tokio::test]
async fn test_melancholic_acoustic_end_to_end() {
    let generator = FakeGenerator::replying(
        "Skinny Love - Bon Iver\n\
         Holocene - Bon Iver\n\
         The Night We Met - Lord Huron\n\
         Fast Car - Tracy Chapman\n\
         Hurt - Johnny Cash",
    );
    let catalog = FakeCatalog {
        hits: vec![
            ("Skinny Love", hit("Skinny Love", "Bon Iver", Some("https://img/1.jpg"))),
            ("Holocene", hit("Holocene", "Bon Iver", Some("https://img/2.jpg"))),
            ("Fast Car", hit("Fast Car", "Tracy Chapman", Some("https://img/4.jpg"))),
        ],
        ..Default::default()
    };
    let resolver = RecommendationResolver::new(generator, catalog);

    let candidates = resolver.resolve("melancholic acoustic").await.unwrap();
    assert_eq!(candidates.len(), 5);

    // Covers are already cached, so nothing needs to be downloaded
    let cache = ImageCache::new();
    for url in ["https://img/1.jpg", "https://img/2.jpg", "https://img/4.jpg"] {
        cache.put(
            url,
            CachedImage::new(DynamicImage::ImageRgb8(RgbImage::new(200, 200)), 200),
        );
    }

    let (ui, mut ui_loop) = dispatch::channel();
    let fetcher = AsyncImageFetcher::with_timeout(cache, ui, std::time::Duration::from_secs(1)).unwrap();
    let mut renderer = RecommendationRenderer::with_fetcher(fetcher, 800);
    let mut plan = renderer.render(candidates);

    assert_eq!(plan.cards.len(), 5);
    assert_eq!(plan.ready_count(), 3);
    assert_eq!(plan.pending_count(), 0);
    assert!(matches!(plan.cards[2].image, CardImage::NoImage));
    assert!(matches!(plan.cards[4].image, CardImage::NoImage));
    assert_eq!(plan.cards[3].candidate.title, "Fast Car");
    assert_eq!(ui_loop.drain(&mut plan), 0);
}
