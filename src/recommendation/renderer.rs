use crate::{
    dispatch::UiHandle,
    recommendation::{
        cache::{CachedImage, ImageCache},
        fetcher::AsyncImageFetcher,
    },
    types::TrackCandidate,
};

/// Largest cover edge a card ever asks for.
pub const MAX_IMAGE_SIZE: u32 = 200;
const MIN_IMAGE_SIZE: u32 = 32;
const CONTENT_PADDING: u32 = 40;
const WIDE_LAYOUT_THRESHOLD: u32 = 600;

/// Grid columns for a window of `width` pixels: 2 below the wide-layout
/// threshold, 3 from it on.
pub fn columns_for_width(width: u32) -> usize {
    if width.saturating_sub(CONTENT_PADDING) < WIDE_LAYOUT_THRESHOLD {
        2
    } else {
        3
    }
}

/// Cover edge for a window of `width` pixels.
pub fn image_size_for_width(width: u32) -> u32 {
    let content = width.saturating_sub(CONTENT_PADDING);
    let columns = columns_for_width(width) as u32;
    (content / columns)
        .saturating_sub(CONTENT_PADDING)
        .clamp(MIN_IMAGE_SIZE, MAX_IMAGE_SIZE)
}

#[derive(Debug, Clone)]
pub enum CardImage {
    Ready(CachedImage),
    Pending { url: String },
    NoImage,
}

impl CardImage {
    pub fn is_pending(&self) -> bool {
        matches!(self, CardImage::Pending { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, CardImage::Ready(_))
    }

    /// Text shown in place of (or next to) the cover.
    pub fn label(&self) -> String {
        match self {
            CardImage::Ready(image) => {
                let (width, height) = image.dimensions();
                format!("{}x{}", width, height)
            }
            CardImage::Pending { .. } => "Loading…".to_string(),
            CardImage::NoImage => "No Image".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Card {
    pub candidate: TrackCandidate,
    pub image: CardImage,
}

/// Display-ready grid produced by one render pass.
///
/// Cards keep candidate order. `generation` identifies the pass; covers that
/// arrive for any other generation are ignored.
#[derive(Debug, Clone, Default)]
pub struct RenderPlan {
    pub generation: u64,
    pub columns: usize,
    pub image_size: u32,
    pub cards: Vec<Card>,
}

impl RenderPlan {
    /// `(row, column)` of the card at `index`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        let columns = self.columns.max(1);
        (index / columns, index % columns)
    }

    pub fn rows(&self) -> usize {
        self.cards.len().div_ceil(self.columns.max(1))
    }

    pub fn pending_count(&self) -> usize {
        self.cards.iter().filter(|c| c.image.is_pending()).count()
    }

    pub fn ready_count(&self) -> usize {
        self.cards.iter().filter(|c| c.image.is_ready()).count()
    }

    pub fn is_settled(&self) -> bool {
        self.pending_count() == 0
    }

    /// Moves a pending card to ready.
    ///
    /// Returns `false` and leaves the plan untouched when `generation` is
    /// stale, the index is out of range, or the card is not pending.
    pub fn apply_image(&mut self, generation: u64, index: usize, image: CachedImage) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.cards.get_mut(index) {
            Some(card) if card.image.is_pending() => {
                card.image = CardImage::Ready(image);
                true
            }
            _ => false,
        }
    }
}

/// Shapes candidates into a [`RenderPlan`] and schedules missing covers.
///
/// For each candidate in order: a cached cover makes the card ready, an
/// uncached URL makes it pending and dispatches a fetch, and no URL leaves
/// it without an image for good. Every call to [`render`](Self::render)
/// starts a new generation, which retires the completions of earlier passes.
pub struct RecommendationRenderer {
    cache: ImageCache,
    fetcher: AsyncImageFetcher<RenderPlan>,
    generation: u64,
    width: u32,
}

impl RecommendationRenderer {
    pub fn new(
        cache: ImageCache,
        ui: UiHandle<RenderPlan>,
        width: u32,
    ) -> Result<Self, reqwest::Error> {
        let fetcher = AsyncImageFetcher::new(cache, ui)?;
        Ok(Self::with_fetcher(fetcher, width))
    }

    pub fn with_fetcher(fetcher: AsyncImageFetcher<RenderPlan>, width: u32) -> Self {
        Self {
            cache: fetcher.cache().clone(),
            fetcher,
            generation: 0,
            width,
        }
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn render(&mut self, candidates: Vec<TrackCandidate>) -> RenderPlan {
        self.generation += 1;
        let generation = self.generation;
        let image_size = image_size_for_width(self.width);

        let cards = candidates
            .into_iter()
            .enumerate()
            .map(|(index, candidate)| {
                let image = match candidate.image_url.as_deref() {
                    None => CardImage::NoImage,
                    Some(url) => match self.cache.get(url) {
                        Some(cached) => CardImage::Ready(cached),
                        None => {
                            self.fetcher.fetch_async(url, image_size, move |plan, image| {
                                plan.apply_image(generation, index, image);
                            });
                            CardImage::Pending {
                                url: url.to_string(),
                            }
                        }
                    },
                };
                Card { candidate, image }
            })
            .collect();

        RenderPlan {
            generation,
            columns: columns_for_width(self.width),
            image_size,
            cards,
        }
    }
}
