use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use brandpulse_core::{BrandConfig, Platform};
use brandpulse_metrics::{ChartSeries, TagCount};

use crate::middleware::RequestId;

use super::{normalize_top_n, parse_platform, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct TopHashtagsQuery {
    pub platform: String,
    /// Brand slug whose posts are counted.
    pub brand: String,
    pub n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UnifiedHashtagsQuery {
    pub platform: String,
    pub n: Option<usize>,
}

/// All hashtag strings for one brand on one platform.
async fn brand_tags(state: &AppState, brand: &BrandConfig, platform: Platform) -> Vec<String> {
    let slug = brand.slug();
    match platform {
        Platform::Instagram => state
            .store
            .instagram_posts(&slug)
            .await
            .into_iter()
            .flat_map(|post| post.hashtags)
            .collect(),
        Platform::Tiktok => state
            .store
            .tiktok_posts(&slug)
            .await
            .into_iter()
            .flat_map(|post| post.hashtags)
            .map(|tag| tag.name)
            .collect(),
    }
}

pub(super) async fn top_hashtags(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TopHashtagsQuery>,
) -> Result<Json<ApiResponse<Vec<TagCount>>>, ApiError> {
    let platform = parse_platform(&req_id.0, &query.platform)?;
    let brand = state.brands.by_slug(&query.brand).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("unknown brand '{}'", query.brand),
        )
    })?;

    let tags = brand_tags(&state, brand, platform).await;
    let data = brandpulse_metrics::top_hashtags(
        tags.iter().map(String::as_str),
        normalize_top_n(query.n, 5),
    );

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn unified_hashtags(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<UnifiedHashtagsQuery>,
) -> Result<Json<ApiResponse<ChartSeries>>, ApiError> {
    let platform = parse_platform(&req_id.0, &query.platform)?;

    let mut per_brand = Vec::with_capacity(state.brands.brands.len());
    for brand in &state.brands.brands {
        let tags = brand_tags(&state, brand, platform).await;
        per_brand.push((brand.name.clone(), tags));
    }

    let unified =
        brandpulse_metrics::unified_top_hashtags(&per_brand, normalize_top_n(query.n, 10));

    Ok(Json(ApiResponse {
        data: unified.to_chart_series(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
