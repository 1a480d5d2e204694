//! # Recommendation Pipeline
//!
//! Turns a free-text mood or genre into a grid of recommendation cards.
//!
//! ```text
//! query ─▶ RecommendationResolver ─▶ Vec<TrackCandidate>
//!                                         │
//!                                         ▼
//!                         RecommendationRenderer ─▶ RenderPlan (owned by the UI loop)
//!                                         │                 ▲
//!                          ImageCache hit │ miss            │ apply_image(generation, index, ..)
//!                                         ▼                 │
//!                                AsyncImageFetcher ──post──▶ UiLoop
//! ```
//!
//! ## Failure isolation
//!
//! - Resolution-level failures ([`ResolutionError`]) stop the pipeline and
//!   produce one user-facing message.
//! - A failed catalog lookup only costs its candidate the cover.
//! - A failed cover download leaves its card pending; other cards are not
//!   affected and nothing is reported.

pub mod cache;
pub mod errors;
pub mod fetcher;
pub mod renderer;
pub mod resolver;

pub use cache::{CacheBound, CachedImage, ImageCache};
pub use errors::{GenerationError, ResolutionError};
pub use fetcher::{AsyncImageFetcher, FetchRequest};
pub use renderer::{Card, CardImage, RecommendationRenderer, RenderPlan};
pub use resolver::{MAX_CANDIDATES, RecommendationResolver, SongGenerator, TrackCatalog};
