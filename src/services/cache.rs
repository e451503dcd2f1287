// src/services/cache.rs
// DOCUMENTATION: In-memory cache for proxied images
// PURPOSE: Avoid refetching the same avatar or CDN image from upstream on every page view

use actix_web::web::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Image body with the content type upstream reported
#[derive(Clone, Debug, PartialEq)]
pub struct CachedImage {
    pub content_type: String,
    pub body: Bytes,
}

/// Largest body kept in the cache
pub const MAX_ENTRY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone, Debug)]
struct CacheEntry {
    image: CachedImage,
    /// Insertion order, lowest is evicted first
    seq: u64,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(image: CachedImage, ttl: Duration, seq: u64) -> Self {
        Self {
            image,
            seq,
            expires_at: Instant::now() + ttl,
        }
    }

    fn size(&self) -> usize {
        self.image.body.len()
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Entries plus the running byte total, guarded by one lock
#[derive(Default)]
struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    bytes: usize,
    next_seq: u64,
}

impl CacheStore {
    fn remove(&mut self, key: &str) {
        if let Some(old) = self.entries.remove(key) {
            self.bytes -= old.size();
        }
    }

    fn remove_expired(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired());
        self.bytes = self.entries.values().map(CacheEntry::size).sum();
        before - self.entries.len()
    }

    fn remove_oldest(&mut self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.seq)
            .map(|(key, _)| key.clone());
        match oldest {
            Some(key) => {
                self.remove(&key);
                true
            }
            None => false,
        }
    }
}

/// Thread-safe TTL cache keyed by upstream URL
/// DOCUMENTATION: Total size stays within `max_total_bytes`. Inserts that would go
/// over it evict expired entries first, then the oldest ones.
pub struct ImageCache {
    store: Arc<RwLock<CacheStore>>,
    default_ttl: Duration,
    /// Entries larger than this are never stored
    max_entry_bytes: usize,
    max_total_bytes: usize,
}

impl ImageCache {
    pub fn new(ttl_seconds: u64, max_total_bytes: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::default())),
            default_ttl: Duration::from_secs(ttl_seconds),
            max_entry_bytes: MAX_ENTRY_BYTES.min(max_total_bytes),
            max_total_bytes,
        }
    }

    pub async fn get(&self, key: &str) -> Option<CachedImage> {
        let store = self.store.read().await;

        match store.entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Image cache HIT for {}", key);
                Some(entry.image.clone())
            }
            Some(_) => {
                log::debug!("Image cache EXPIRED for {}", key);
                None
            }
            None => {
                log::debug!("Image cache MISS for {}", key);
                None
            }
        }
    }

    pub async fn set(&self, key: String, image: CachedImage) {
        self.set_with_ttl(key, image, self.default_ttl).await;
    }

    pub async fn set_with_ttl(&self, key: String, image: CachedImage, ttl: Duration) {
        if image.body.len() > self.max_entry_bytes {
            log::debug!(
                "Image cache SKIP for {} ({} bytes over limit)",
                key,
                image.body.len()
            );
            return;
        }
        let mut store = self.store.write().await;
        store.remove(&key);
        let entry = CacheEntry::new(image, ttl, store.next_seq);
        store.next_seq += 1;

        if store.bytes + entry.size() > self.max_total_bytes {
            let expired = store.remove_expired();
            let mut evicted = 0;
            while store.bytes + entry.size() > self.max_total_bytes && store.remove_oldest() {
                evicted += 1;
            }
            log::debug!(
                "Image cache over budget: dropped {} expired and {} oldest entries",
                expired,
                evicted
            );
        }

        log::debug!("Image cache SET for {} (TTL: {}s)", key, ttl.as_secs());
        store.bytes += entry.size();
        store.entries.insert(key, entry);
    }

    /// Clear expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let removed = store.remove_expired();

        if removed > 0 {
            log::info!(
                "Image cache cleanup: removed {} expired entries ({} remaining)",
                removed,
                store.entries.len()
            );
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.entries.len();
        let expired = store.entries.values().filter(|e| e.is_expired()).count();
        let bytes = store.bytes;

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
            total_bytes: bytes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
    pub total_bytes: usize,
}

/// Start background cleanup task
/// DOCUMENTATION: Periodically removes expired entries
pub fn start_cleanup_task(cache: Arc<ImageCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(len: usize) -> CachedImage {
        CachedImage {
            content_type: "image/png".to_string(),
            body: Bytes::from(vec![0u8; len]),
        }
    }

    #[tokio::test]
    async fn test_cache_set_get() {
        let cache = ImageCache::new(60, 64 * 1024 * 1024);
        let key = "https://unavatar.io/instagram/ayse".to_string();

        cache.set(key.clone(), png(128)).await;

        assert_eq!(cache.get(&key).await, Some(png(128)));
        assert!(cache.get("https://unavatar.io/instagram/other").await.is_none());
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = ImageCache::new(1, 64 * 1024 * 1024);
        let key = "k".to_string();

        cache.set(key.clone(), png(10)).await;
        assert!(cache.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_oversized_entries_are_skipped() {
        let cache = ImageCache::new(60, 64 * 1024 * 1024);
        cache.set("big".to_string(), png(3 * 1024 * 1024)).await;
        assert!(cache.get("big").await.is_none());
    }

    #[tokio::test]
    async fn test_total_budget_evicts_oldest() {
        let cache = ImageCache::new(60, 10 * 1024);
        for i in 0..200 {
            cache.set(format!("https://picsum.photos/200?i={}", i), png(1024)).await;
        }

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 10);
        assert_eq!(stats.total_bytes, 10 * 1024);
        assert!(cache.get("https://picsum.photos/200?i=199").await.is_some());
        assert!(cache.get("https://picsum.photos/200?i=189").await.is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted_before_oldest() {
        let cache = ImageCache::new(60, 3 * 1024);
        cache.set("a".to_string(), png(1024)).await;
        cache
            .set_with_ttl("stale".to_string(), png(1024), Duration::ZERO)
            .await;
        cache.set("b".to_string(), png(1024)).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        cache.set("c".to_string(), png(1024)).await;

        assert!(cache.get("a").await.is_some());
        assert!(cache.get("b").await.is_some());
        assert!(cache.get("c").await.is_some());
        assert_eq!(cache.stats().await.total_bytes, 3 * 1024);
    }

    #[tokio::test]
    async fn test_replacing_a_key_keeps_byte_total() {
        let cache = ImageCache::new(60, 64 * 1024);
        cache.set("a".to_string(), png(4096)).await;
        cache.set("a".to_string(), png(1024)).await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_bytes, 1024);
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = ImageCache::new(1, 64 * 1024 * 1024);

        cache.set("a".to_string(), png(1)).await;
        cache.set("b".to_string(), png(2)).await;

        tokio::time::sleep(Duration::from_secs(2)).await;

        cache.cleanup().await;

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.total_bytes, 0);
    }
}
