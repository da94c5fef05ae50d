//! Fan-out refresh: fetch every brand's rows concurrently and store the
//! normalized posts under one batch version.

use futures::future::join_all;

use brandpulse_core::{BrandConfig, Platform};
use brandpulse_ingest::{normalize_instagram_rows, normalize_tiktok_rows, RawRow};

use crate::source::RowSource;
use crate::store::{PostSet, PostStore};

/// Outcome of one brand's refresh within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandRefresh {
    pub slug: String,
    pub post_count: usize,
}

/// Refreshes every brand on one platform.
///
/// The whole batch shares a single version stamped before any fetch starts,
/// so a batch that is overtaken by a later one cannot overwrite its results.
/// Fetches run concurrently via `join_all` and are matched back to brands by
/// position in `brands`, never by completion order. A failed fetch logs a
/// warning and stores an empty post list for that brand; the rest of the
/// batch is unaffected.
pub async fn refresh_brands<S: RowSource>(
    store: &PostStore,
    source: &S,
    brands: &[BrandConfig],
    platform: Platform,
) -> Vec<BrandRefresh> {
    let version = store.next_version();
    tracing::info!(%platform, version, brand_count = brands.len(), "starting refresh batch");

    let fetches = brands.iter().map(|brand| source.fetch_rows(brand, platform));
    let results = join_all(fetches).await;

    let mut outcomes = Vec::with_capacity(brands.len());
    for (brand, result) in brands.iter().zip(results) {
        let rows: Vec<RawRow> = match result {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(brand = %brand.name, %platform, error = %e, "fetch failed, storing empty post list");
                Vec::new()
            }
        };

        let posts = match platform {
            Platform::Instagram => PostSet::Instagram(normalize_instagram_rows(&rows)),
            Platform::Tiktok => PostSet::Tiktok(normalize_tiktok_rows(&rows)),
        };

        let slug = brand.slug();
        let post_count = posts.len();
        if store.apply(&slug, version, posts).await {
            tracing::debug!(slug, %platform, post_count, "stored refreshed posts");
        }
        outcomes.push(BrandRefresh { slug, post_count });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use brandpulse_core::BrandRole;

    use super::*;
    use crate::error::StoreError;

    /// Canned source: rows per sheet id, anything else errors.
    struct CannedSource {
        sheets: HashMap<String, Vec<RawRow>>,
    }

    impl RowSource for CannedSource {
        async fn fetch_rows(
            &self,
            brand: &BrandConfig,
            platform: Platform,
        ) -> Result<Vec<RawRow>, StoreError> {
            let Some(sheet_id) = brand.sheet_for(platform) else {
                return Ok(Vec::new());
            };
            self.sheets.get(sheet_id).cloned().ok_or_else(|| {
                StoreError::UnexpectedStatus {
                    status: 500,
                    url: format!("canned://{sheet_id}"),
                }
            })
        }
    }

    fn brand(name: &str, ig_sheet: Option<&str>) -> BrandConfig {
        BrandConfig {
            name: name.to_string(),
            role: BrandRole::Competitor,
            instagram_sheet: ig_sheet.map(str::to_string),
            tiktok_sheet: None,
            notes: None,
        }
    }

    fn ig_row(likes: u64) -> RawRow {
        json!({
            "likesCount": likes,
            "commentsCount": 0,
            "timestamp": "2024-03-01T00:00:00Z",
        })
        .as_object()
        .expect("test row must be an object")
        .clone()
    }

    #[tokio::test]
    async fn results_are_associated_by_index_not_completion_order() {
        let mut sheets = HashMap::new();
        sheets.insert("a-sheet".to_string(), vec![ig_row(1)]);
        sheets.insert("b-sheet".to_string(), vec![ig_row(1), ig_row(2)]);
        let source = CannedSource { sheets };

        let brands = vec![brand("Alpha", Some("a-sheet")), brand("Beta", Some("b-sheet"))];
        let store = PostStore::new();

        let outcomes = refresh_brands(&store, &source, &brands, Platform::Instagram).await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0], BrandRefresh { slug: "alpha".to_string(), post_count: 1 });
        assert_eq!(outcomes[1], BrandRefresh { slug: "beta".to_string(), post_count: 2 });
        assert_eq!(store.instagram_posts("alpha").await.len(), 1);
        assert_eq!(store.instagram_posts("beta").await.len(), 2);
    }

    #[tokio::test]
    async fn failing_brand_stores_empty_without_poisoning_the_batch() {
        let mut sheets = HashMap::new();
        sheets.insert("good-sheet".to_string(), vec![ig_row(5)]);
        let source = CannedSource { sheets };

        let brands = vec![
            brand("Good", Some("good-sheet")),
            brand("Bad", Some("missing-sheet")),
        ];
        let store = PostStore::new();

        let outcomes = refresh_brands(&store, &source, &brands, Platform::Instagram).await;

        assert_eq!(outcomes[0].post_count, 1);
        assert_eq!(outcomes[1].post_count, 0);
        assert!(store.instagram_posts("bad").await.is_empty());
        assert_eq!(store.instagram_posts("good").await.len(), 1);
    }

    #[tokio::test]
    async fn brand_without_a_sheet_stores_empty() {
        let source = CannedSource { sheets: HashMap::new() };
        let brands = vec![brand("No Sheet", None)];
        let store = PostStore::new();

        let outcomes = refresh_brands(&store, &source, &brands, Platform::Instagram).await;
        assert_eq!(outcomes[0].post_count, 0);
        assert!(store
            .get("no-sheet", Platform::Instagram)
            .await
            .is_some(), "an empty snapshot is still stored");
    }
}
