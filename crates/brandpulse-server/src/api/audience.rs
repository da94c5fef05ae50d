//! Creator and region rollup endpoints.
//!
//! Both are TikTok-only: Instagram export rows carry no author or
//! location metadata, so there is no platform parameter here.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use brandpulse_core::TikTokPost;
use brandpulse_metrics::{CreatorRank, RegionCount};

use crate::middleware::RequestId;

use super::{normalize_top_n, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct TopCreatorsQuery {
    /// Brand slug whose posts are ranked.
    pub brand: String,
    pub n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RegionQuery {
    pub brand: String,
}

async fn brand_tiktok_posts(
    state: &AppState,
    request_id: &str,
    slug: &str,
) -> Result<Vec<TikTokPost>, ApiError> {
    let brand = state.brands.by_slug(slug).ok_or_else(|| {
        ApiError::new(
            request_id.to_string(),
            "not_found",
            format!("unknown brand '{slug}'"),
        )
    })?;
    Ok(state.store.tiktok_posts(&brand.slug()).await)
}

pub(super) async fn top_creators(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TopCreatorsQuery>,
) -> Result<Json<ApiResponse<Vec<CreatorRank>>>, ApiError> {
    let posts = brand_tiktok_posts(&state, &req_id.0, &query.brand).await?;
    let data = brandpulse_metrics::top_creators(&posts, normalize_top_n(query.n, 5));

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn region_distribution(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RegionQuery>,
) -> Result<Json<ApiResponse<Vec<RegionCount>>>, ApiError> {
    let posts = brand_tiktok_posts(&state, &req_id.0, &query.brand).await?;
    let data = brandpulse_metrics::region_distribution(&posts);

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
