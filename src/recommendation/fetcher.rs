use std::time::Duration;

use image::{DynamicImage, imageops::FilterType};
use reqwest::Client;

use crate::{
    config,
    dispatch::UiHandle,
    recommendation::cache::{CachedImage, ImageCache},
};

type Completion<S> = Box<dyn FnOnce(&mut S, CachedImage) + Send + 'static>;

/// One outstanding cover download.
///
/// Lives until the download finishes or fails. The completion is the only
/// link back to the requester; it captures whatever identifies its target
/// (a card index, a generation), never just the URL.
pub struct FetchRequest<S> {
    pub url: String,
    pub target_size: u32,
    on_complete: Completion<S>,
}

impl<S> FetchRequest<S> {
    pub fn new<F>(url: impl Into<String>, target_size: u32, on_complete: F) -> Self
    where
        F: FnOnce(&mut S, CachedImage) + Send + 'static,
    {
        Self {
            url: url.into(),
            target_size,
            on_complete: Box::new(on_complete),
        }
    }
}

/// Downloads covers on background tasks and hands them to the UI loop.
///
/// Each request is a single GET bounded by the client timeout. The body is
/// decoded and scaled off the async workers, stored in the [`ImageCache`],
/// and the completion is posted through the [`UiHandle`] so it runs on the
/// loop that owns `S`.
///
/// Failures of any kind (network, timeout, non-2xx, undecodable body) drop
/// the request silently: the completion never runs. Requests for the same
/// URL are not coalesced.
pub struct AsyncImageFetcher<S> {
    http: Client,
    cache: ImageCache,
    ui: UiHandle<S>,
}

impl<S: 'static> AsyncImageFetcher<S> {
    pub fn new(cache: ImageCache, ui: UiHandle<S>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(cache, ui, config::image_fetch_timeout())
    }

    pub fn with_timeout(
        cache: ImageCache,
        ui: UiHandle<S>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(cache, ui, http))
    }

    /// Uses `http` as is; its timeout bounds every download.
    pub fn with_client(cache: ImageCache, ui: UiHandle<S>, http: Client) -> Self {
        Self { http, cache, ui }
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn fetch_async<F>(&self, url: &str, target_size: u32, on_complete: F)
    where
        F: FnOnce(&mut S, CachedImage) + Send + 'static,
    {
        self.dispatch(FetchRequest::new(url, target_size, on_complete));
    }

    pub fn dispatch(&self, request: FetchRequest<S>) {
        let http = self.http.clone();
        let cache = self.cache.clone();
        let ui = self.ui.clone();

        tokio::spawn(async move {
            let FetchRequest {
                url,
                target_size,
                on_complete,
            } = request;

            let Some(image) = download(&http, &url, target_size).await else {
                return;
            };

            cache.put(&url, image.clone());
            ui.post(move |state| on_complete(state, image));
        });
    }
}

async fn download(http: &Client, url: &str, target_size: u32) -> Option<CachedImage> {
    let response = http.get(url).send().await.ok()?.error_for_status().ok()?;
    let bytes = response.bytes().await.ok()?;

    tokio::task::spawn_blocking(move || decode_and_scale(&bytes, target_size))
        .await
        .ok()?
}

pub fn decode_and_scale(bytes: &[u8], target_size: u32) -> Option<CachedImage> {
    let decoded = image::load_from_memory(bytes).ok()?;
    Some(CachedImage::new(
        scale_to_fill(&decoded, target_size),
        target_size,
    ))
}

/// Scales `image` so it covers a `size`×`size` square, keeping its aspect
/// ratio. The shorter side ends up at `size`; nothing is cropped.
pub fn scale_to_fill(image: &DynamicImage, size: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 || size == 0 {
        return image.clone();
    }

    let scale = f64::max(
        size as f64 / width as f64,
        size as f64 / height as f64,
    );
    let target_width = ((width as f64 * scale).round() as u32).max(size);
    let target_height = ((height as f64 * scale).round() as u32).max(size);

    if (target_width, target_height) == (width, height) {
        return image.clone();
    }
    image.resize_exact(target_width, target_height, FilterType::Lanczos3)
}
