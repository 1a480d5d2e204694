use std::thread;

use image::{DynamicImage, RgbImage};
use moodtune::recommendation::{CacheBound, CachedImage, ImageCache};

fn cover(width: u32, height: u32) -> CachedImage {
    CachedImage::new(DynamicImage::ImageRgb8(RgbImage::new(width, height)), width.min(height))
}

#[test]
fn test_get_returns_what_was_put() {
    let cache = ImageCache::new();
    let image = cover(120, 80);

    assert!(cache.get("https://img/a.jpg").is_none());

    cache.put("https://img/a.jpg", image.clone());

    let cached = cache.get("https://img/a.jpg").unwrap();
    assert!(cached.same_image(&image));
    assert_eq!(cached.dimensions(), (120, 80));
    assert_eq!(cached.size(), 80);
    assert!(cache.contains("https://img/a.jpg"));
    assert!(!cache.contains("https://img/b.jpg"));
}

#[test]
fn test_put_replaces_existing_entry() {
    let cache = ImageCache::new();
    let first = cover(50, 50);
    let second = cover(60, 60);

    cache.put("https://img/a.jpg", first.clone());
    cache.put("https://img/a.jpg", second.clone());

    let cached = cache.get("https://img/a.jpg").unwrap();
    assert!(cached.same_image(&second));
    assert!(!cached.same_image(&first));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_clones_share_entries() {
    let cache = ImageCache::new();
    let other = cache.clone();

    other.put("https://img/a.jpg", cover(10, 10));

    assert!(cache.contains("https://img/a.jpg"));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_unbounded_by_default() {
    let cache = ImageCache::new();
    assert_eq!(cache.bound(), CacheBound::Unbounded);
    assert!(cache.is_empty());

    for i in 0..100 {
        cache.put(&format!("https://img/{}.jpg", i), cover(4, 4));
    }
    assert_eq!(cache.len(), 100);
}

#[test]
fn test_max_entries_evicts_oldest_first() {
    let cache = ImageCache::with_bound(CacheBound::MaxEntries(2));

    cache.put("https://img/1.jpg", cover(4, 4));
    cache.put("https://img/2.jpg", cover(4, 4));
    cache.put("https://img/3.jpg", cover(4, 4));

    assert_eq!(cache.len(), 2);
    assert!(!cache.contains("https://img/1.jpg"));
    assert!(cache.contains("https://img/2.jpg"));
    assert!(cache.contains("https://img/3.jpg"));

    // Overwriting keeps the first insertion slot
    cache.put("https://img/2.jpg", cover(8, 8));
    cache.put("https://img/4.jpg", cover(4, 4));

    assert!(!cache.contains("https://img/2.jpg"));
    assert!(cache.contains("https://img/3.jpg"));
    assert!(cache.contains("https://img/4.jpg"));
}

#[test]
fn test_concurrent_access() {
    let cache = ImageCache::new();
    let shared = cover(16, 16);

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let cache = cache.clone();
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    cache.put(&format!("https://img/{}-{}.jpg", worker, i), shared.clone());
                    cache.put("https://img/shared.jpg", shared.clone());
                    assert!(cache.get("https://img/shared.jpg").is_some());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 8 * 25 + 1);
    assert!(cache.get("https://img/shared.jpg").unwrap().same_image(&shared));
}
