use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use brandpulse_core::{Platform, Scored};
use brandpulse_metrics::{filter_posts, DateSentiment, SentimentDistribution};

use crate::middleware::RequestId;

use super::{parse_platform, resolve_selection, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DistributionQuery {
    pub platform: String,
    pub brand: String,
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ByDateQuery {
    pub platform: String,
    pub brand: String,
}

pub(super) async fn sentiment_distribution(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DistributionQuery>,
) -> Result<Json<ApiResponse<SentimentDistribution>>, ApiError> {
    let platform = parse_platform(&req_id.0, &query.platform)?;
    let brand = state.brands.by_slug(&query.brand).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("unknown brand '{}'", query.brand),
        )
    })?;

    let month = query.month.as_deref().unwrap_or("All");
    let selection =
        resolve_selection(&req_id.0, &state.config, platform, month, None, None)?;

    let slug = brand.slug();
    let data = match platform {
        Platform::Instagram => {
            let posts = state.store.instagram_posts(&slug).await;
            brandpulse_metrics::sentiment_distribution(
                filter_posts(&posts, &selection)
                    .into_iter()
                    .map(|post| post.sentiment().label),
            )
        }
        Platform::Tiktok => {
            let posts = state.store.tiktok_posts(&slug).await;
            brandpulse_metrics::sentiment_distribution(
                filter_posts(&posts, &selection)
                    .into_iter()
                    .map(|post| post.sentiment().label),
            )
        }
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn sentiment_by_date(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ByDateQuery>,
) -> Result<Json<ApiResponse<Vec<DateSentiment>>>, ApiError> {
    let platform = parse_platform(&req_id.0, &query.platform)?;
    let brand = state.brands.by_slug(&query.brand).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("unknown brand '{}'", query.brand),
        )
    })?;

    let slug = brand.slug();
    let data = match platform {
        Platform::Instagram => {
            let posts = state.store.instagram_posts(&slug).await;
            brandpulse_metrics::sentiment_by_date(&posts)
        }
        Platform::Tiktok => {
            let posts = state.store.tiktok_posts(&slug).await;
            brandpulse_metrics::sentiment_by_date(&posts)
        }
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
