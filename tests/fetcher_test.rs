use std::{
    io::Cursor,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{Router, http::StatusCode, routing::get};
use image::{DynamicImage, ImageFormat, RgbImage};
use moodtune::{
    dispatch,
    recommendation::{
        AsyncImageFetcher, CachedImage, FetchRequest, ImageCache,
        fetcher::{decode_and_scale, scale_to_fill},
    },
};

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Serves `/cover.png` (counting hits), an undecodable `/garbage.png`, a
/// `/missing.png` that answers 404 and a `/slow.png` that takes 3 seconds.
async fn serve_covers(hits: Arc<AtomicUsize>) -> String {
    let png = png_bytes(100, 50);
    let slow_png = png.clone();
    let app = Router::new()
        .route(
            "/cover.png",
            get(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                let png = png.clone();
                async move { png }
            }),
        )
        .route("/garbage.png", get(|| async { "definitely not a png" }))
        .route("/missing.png", get(|| async { StatusCode::NOT_FOUND }))
        .route(
            "/slow.png",
            get(move || {
                let png = slow_png.clone();
                async move {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    png
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[test]
fn test_scale_to_fill_covers_target_square() {
    let wide = DynamicImage::ImageRgb8(RgbImage::new(100, 50));
    let scaled = scale_to_fill(&wide, 40);
    assert_eq!((scaled.width(), scaled.height()), (80, 40));

    let tall = DynamicImage::ImageRgb8(RgbImage::new(30, 90));
    let scaled = scale_to_fill(&tall, 60);
    assert_eq!((scaled.width(), scaled.height()), (60, 180));

    let square = DynamicImage::ImageRgb8(RgbImage::new(640, 640));
    let scaled = scale_to_fill(&square, 200);
    assert_eq!((scaled.width(), scaled.height()), (200, 200));

    // Small images are scaled up as well
    let small = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
    let scaled = scale_to_fill(&small, 32);
    assert_eq!((scaled.width(), scaled.height()), (32, 32));
}

#[test]
fn test_decode_and_scale() {
    let cached = decode_and_scale(&png_bytes(100, 50), 40).unwrap();
    assert_eq!(cached.dimensions(), (80, 40));
    assert_eq!(cached.size(), 40);

    assert!(decode_and_scale(b"not an image", 40).is_none());
    assert!(decode_and_scale(&[], 40).is_none());
}

#[tokio::test]
async fn test_fetch_caches_and_completes_on_ui_loop() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = serve_covers(Arc::clone(&hits)).await;
    let url = format!("{}/cover.png", base);

    let cache = ImageCache::new();
    let (ui, mut ui_loop) = dispatch::channel::<Vec<(String, CachedImage)>>();
    let fetcher = AsyncImageFetcher::with_timeout(cache.clone(), ui, Duration::from_secs(5)).unwrap();

    fetcher.fetch_async(&url, 40, |received, image| {
        received.push(("first".to_string(), image));
    });

    let mut received = Vec::new();
    let done = ui_loop
        .pump_until(&mut received, Duration::from_secs(5), |r| r.len() == 1)
        .await;

    assert!(done);
    assert_eq!(received[0].0, "first");
    assert_eq!(received[0].1.dimensions(), (80, 40));
    assert!(cache.get(&url).unwrap().same_image(&received[0].1));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_requests_for_same_url_both_complete() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = serve_covers(Arc::clone(&hits)).await;
    let url = format!("{}/cover.png", base);

    let cache = ImageCache::new();
    let (ui, mut ui_loop) = dispatch::channel::<Vec<usize>>();
    let fetcher = AsyncImageFetcher::with_timeout(cache.clone(), ui, Duration::from_secs(5)).unwrap();

    fetcher.fetch_async(&url, 40, |received, _| received.push(0));
    fetcher.dispatch(FetchRequest::new(url.clone(), 40, |received: &mut Vec<usize>, _| {
        received.push(1)
    }));

    let mut received = Vec::new();
    let done = ui_loop
        .pump_until(&mut received, Duration::from_secs(5), |r| r.len() == 2)
        .await;

    assert!(done);
    received.sort();
    assert_eq!(received, vec![0, 1]);

    // Requests are not coalesced
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_failed_fetches_are_silent() {
    let base = serve_covers(Arc::new(AtomicUsize::new(0))).await;

    let cache = ImageCache::new();
    let (ui, mut ui_loop) = dispatch::channel::<usize>();
    let fetcher = AsyncImageFetcher::with_timeout(cache.clone(), ui, Duration::from_secs(2)).unwrap();

    for path in ["missing.png", "garbage.png"] {
        fetcher.fetch_async(&format!("{}/{}", base, path), 40, |completed, _| {
            *completed += 1;
        });
    }
    // Connection refused
    fetcher.fetch_async("http://127.0.0.1:9/cover.png", 40, |completed, _| {
        *completed += 1;
    });

    let mut completed = 0;
    let done = ui_loop
        .pump_until(&mut completed, Duration::from_secs(3), |c| *c > 0)
        .await;

    assert!(!done);
    assert_eq!(completed, 0);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_stalled_download_times_out() {
    let base = serve_covers(Arc::new(AtomicUsize::new(0))).await;
    let url = format!("{}/slow.png", base);

    let cache = ImageCache::new();
    let (ui, mut ui_loop) = dispatch::channel::<usize>();
    let fetcher = AsyncImageFetcher::with_timeout(cache.clone(), ui, Duration::from_secs(1)).unwrap();

    fetcher.fetch_async(&url, 40, |completed, _| {
        *completed += 1;
    });

    // The server answers after 3 seconds; wait past that to see nothing arrives
    let mut completed = 0;
    let done = ui_loop
        .pump_until(&mut completed, Duration::from_secs(4), |c| *c > 0)
        .await;

    assert!(!done);
    assert_eq!(completed, 0);
    assert!(!cache.contains(&url));
}

#[tokio::test]
async fn test_supplied_client_timeout_bounds_downloads() {
    let base = serve_covers(Arc::new(AtomicUsize::new(0))).await;
    let slow_url = format!("{}/slow.png", base);
    let cover_url = format!("{}/cover.png", base);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let cache = ImageCache::new();
    let (ui, mut ui_loop) = dispatch::channel::<Vec<String>>();
    let fetcher = AsyncImageFetcher::with_client(cache.clone(), ui, http);

    for url in [&slow_url, &cover_url] {
        let name = url.clone();
        fetcher.fetch_async(url, 40, move |received, _| received.push(name));
    }

    let mut received = Vec::new();
    ui_loop
        .pump_until(&mut received, Duration::from_secs(4), |_| false)
        .await;

    assert_eq!(received, vec![cover_url.clone()]);
    assert!(cache.contains(&cover_url));
    assert!(!cache.contains(&slow_url));
}
