//! Versioned in-memory post store.
//!
//! Every refresh batch stamps a fresh monotonic version before any fetch
//! starts, and [`PostStore::apply`] only accepts a snapshot whose version is
//! strictly newer than the stored one. A slow older batch that resolves after
//! a newer one can therefore never clobber fresher data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use brandpulse_core::{InstagramPost, Platform, TikTokPost};

/// Normalized posts for one brand on one platform.
#[derive(Debug, Clone)]
pub enum PostSet {
    Instagram(Vec<InstagramPost>),
    Tiktok(Vec<TikTokPost>),
}

impl PostSet {
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            Self::Instagram(_) => Platform::Instagram,
            Self::Tiktok(_) => Platform::Tiktok,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Instagram(posts) => posts.len(),
            Self::Tiktok(posts) => posts.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One brand/platform entry: the posts plus the batch version that wrote them.
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    pub version: u64,
    pub fetched_at: DateTime<Utc>,
    pub posts: PostSet,
}

/// Concurrent map of `(brand slug, platform)` to the latest snapshot.
#[derive(Debug, Default)]
pub struct PostStore {
    snapshots: RwLock<HashMap<(String, Platform), StoredSnapshot>>,
    next_version: AtomicU64,
}

impl PostStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the version stamp for a refresh batch. Strictly increasing
    /// across the life of the store.
    pub fn next_version(&self) -> u64 {
        self.next_version.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Writes a snapshot unless the stored entry is already at the same or a
    /// newer version. Returns whether the write happened.
    pub async fn apply(&self, slug: &str, version: u64, posts: PostSet) -> bool {
        let platform = posts.platform();
        let key = (slug.to_string(), platform);
        let mut snapshots = self.snapshots.write().await;

        if let Some(existing) = snapshots.get(&key) {
            if existing.version >= version {
                tracing::debug!(
                    slug,
                    %platform,
                    stored = existing.version,
                    incoming = version,
                    "discarding stale refresh result"
                );
                return false;
            }
        }

        snapshots.insert(
            key,
            StoredSnapshot {
                version,
                fetched_at: Utc::now(),
                posts,
            },
        );
        true
    }

    /// Clones out the latest snapshot for a brand/platform, if any.
    pub async fn get(&self, slug: &str, platform: Platform) -> Option<StoredSnapshot> {
        let snapshots = self.snapshots.read().await;
        snapshots.get(&(slug.to_string(), platform)).cloned()
    }

    /// Instagram posts for a brand; empty when nothing is stored yet.
    pub async fn instagram_posts(&self, slug: &str) -> Vec<InstagramPost> {
        match self.get(slug, Platform::Instagram).await {
            Some(StoredSnapshot {
                posts: PostSet::Instagram(posts),
                ..
            }) => posts,
            _ => Vec::new(),
        }
    }

    /// TikTok posts for a brand; empty when nothing is stored yet.
    pub async fn tiktok_posts(&self, slug: &str) -> Vec<TikTokPost> {
        match self.get(slug, Platform::Tiktok).await {
            Some(StoredSnapshot {
                posts: PostSet::Tiktok(posts),
                ..
            }) => posts,
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_set(count: usize) -> PostSet {
        let mut posts = Vec::new();
        for _ in 0..count {
            posts.push(InstagramPost {
                id: uuid::Uuid::new_v4(),
                timestamp: Utc::now(),
                caption: String::new(),
                likes_count: 0,
                comments_count: 0,
                media_type: brandpulse_core::MediaType::Image,
                hashtags: Vec::new(),
                mentions: Vec::new(),
                is_sponsored: false,
                video_view_count: None,
                video_play_count: None,
                sentiment: brandpulse_core::SentimentScore::neutral(),
            });
        }
        PostSet::Instagram(posts)
    }

    #[tokio::test]
    async fn missing_entry_reads_as_empty() {
        let store = PostStore::new();
        assert!(store.get("nordstrom", Platform::Instagram).await.is_none());
        assert!(store.instagram_posts("nordstrom").await.is_empty());
    }

    #[tokio::test]
    async fn versions_are_strictly_increasing() {
        let store = PostStore::new();
        let a = store.next_version();
        let b = store.next_version();
        assert!(b > a, "expected {b} > {a}");
    }

    #[tokio::test]
    async fn newer_version_replaces_older() {
        let store = PostStore::new();
        let v1 = store.next_version();
        let v2 = store.next_version();

        assert!(store.apply("nordstrom", v1, post_set(1)).await);
        assert!(store.apply("nordstrom", v2, post_set(3)).await);

        let snapshot = store
            .get("nordstrom", Platform::Instagram)
            .await
            .expect("snapshot should exist");
        assert_eq!(snapshot.version, v2);
        assert_eq!(snapshot.posts.len(), 3);
    }

    #[tokio::test]
    async fn stale_batch_cannot_clobber_newer_data() {
        let store = PostStore::new();
        let old_batch = store.next_version();
        let new_batch = store.next_version();

        // The newer batch resolves first.
        assert!(store.apply("nordstrom", new_batch, post_set(3)).await);
        // The slower, older batch arrives late and must be discarded.
        assert!(!store.apply("nordstrom", old_batch, post_set(1)).await);

        let snapshot = store
            .get("nordstrom", Platform::Instagram)
            .await
            .expect("snapshot should exist");
        assert_eq!(snapshot.version, new_batch);
        assert_eq!(snapshot.posts.len(), 3);
    }

    #[tokio::test]
    async fn platforms_are_stored_independently() {
        let store = PostStore::new();
        let v = store.next_version();
        assert!(store.apply("nordstrom", v, post_set(2)).await);

        assert!(store.tiktok_posts("nordstrom").await.is_empty());
        assert_eq!(store.instagram_posts("nordstrom").await.len(), 2);
    }
}
