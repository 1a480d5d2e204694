//! Process-wide memo of decoded, pre-scaled cover images keyed by URL.
//!
//! Entries never expire: once a URL is cached it is served for the rest of
//! the process lifetime. Growth is unbounded unless a [`CacheBound`] is
//! configured, in which case the oldest insertion is evicted first.
//!
//! Concurrent readers and writers share one `RwLock`. Writes replace an entry
//! wholesale, so when two fetches for the same URL race the last writer wins.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use image::DynamicImage;

use crate::config;

/// Size limit applied on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBound {
    #[default]
    Unbounded,
    MaxEntries(usize),
}

/// A decoded cover together with the target size it was scaled for.
#[derive(Debug, Clone)]
pub struct CachedImage {
    image: Arc<DynamicImage>,
    size: u32,
}

impl CachedImage {
    pub fn new(image: DynamicImage, size: u32) -> Self {
        Self {
            image: Arc::new(image),
            size,
        }
    }

    pub fn image(&self) -> &Arc<DynamicImage> {
        &self.image
    }

    /// Target size the image was scaled for.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Actual pixel dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Whether both values share the same decoded pixels.
    pub fn same_image(&self, other: &CachedImage) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
    }
}

#[derive(Default)]
struct Entries {
    images: HashMap<String, CachedImage>,
    insertion_order: VecDeque<String>,
}

#[derive(Clone, Default)]
pub struct ImageCache {
    bound: CacheBound,
    entries: Arc<RwLock<Entries>>,
}

static GLOBAL: OnceLock<ImageCache> = OnceLock::new();

impl ImageCache {
    pub fn new() -> Self {
        Self::with_bound(CacheBound::Unbounded)
    }

    pub fn with_bound(bound: CacheBound) -> Self {
        Self {
            bound,
            entries: Arc::new(RwLock::new(Entries::default())),
        }
    }

    /// The shared instance, bounded by `IMAGE_CACHE_MAX_ENTRIES` when set.
    pub fn global() -> ImageCache {
        GLOBAL
            .get_or_init(|| match config::image_cache_max_entries() {
                Some(max) => ImageCache::with_bound(CacheBound::MaxEntries(max)),
                None => ImageCache::new(),
            })
            .clone()
    }

    pub fn bound(&self) -> CacheBound {
        self.bound
    }

    pub fn get(&self, url: &str) -> Option<CachedImage> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.images.get(url).cloned()
    }

    pub fn put(&self, url: &str, image: CachedImage) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if entries.images.insert(url.to_string(), image).is_none() {
            entries.insertion_order.push_back(url.to_string());
        }

        if let CacheBound::MaxEntries(max) = self.bound {
            while entries.images.len() > max {
                match entries.insertion_order.pop_front() {
                    Some(oldest) => {
                        entries.images.remove(&oldest);
                    }
                    None => break,
                }
            }
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.images.contains_key(url)
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
