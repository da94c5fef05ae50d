use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brandpulse_core::Platform;
use brandpulse_metrics::{
    compare_instagram, compare_tiktok, filter_posts, BrandPair, InstagramEngagement,
    TikTokEngagement,
};

use crate::middleware::RequestId;

use super::{parse_platform, resolve_selection, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct EngagementQuery {
    pub platform: String,
    /// Competitor slug compared against the primary brand.
    pub competitor: String,
    pub month: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum EngagementSummary {
    Instagram(BrandPair<InstagramEngagement>),
    Tiktok(BrandPair<TikTokEngagement>),
}

pub(super) async fn engagement_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<EngagementQuery>,
) -> Result<Json<ApiResponse<EngagementSummary>>, ApiError> {
    let platform = parse_platform(&req_id.0, &query.platform)?;
    let month = query.month.as_deref().unwrap_or("All");
    let selection = resolve_selection(
        &req_id.0,
        &state.config,
        platform,
        month,
        query.start,
        query.end,
    )?;

    let primary = state.brands.primary().ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "internal_error",
            "brand roster has no primary brand",
        )
    })?;
    let competitor = state.brands.by_slug(&query.competitor).ok_or_else(|| {
        ApiError::new(
            req_id.0.clone(),
            "not_found",
            format!("unknown brand '{}'", query.competitor),
        )
    })?;

    let data = match platform {
        Platform::Instagram => {
            let primary_posts = state.store.instagram_posts(&primary.slug()).await;
            let competitor_posts = state.store.instagram_posts(&competitor.slug()).await;
            EngagementSummary::Instagram(compare_instagram(
                filter_posts(&primary_posts, &selection),
                filter_posts(&competitor_posts, &selection),
            ))
        }
        Platform::Tiktok => {
            let primary_posts = state.store.tiktok_posts(&primary.slug()).await;
            let competitor_posts = state.store.tiktok_posts(&competitor.slug()).await;
            EngagementSummary::Tiktok(compare_tiktok(
                filter_posts(&primary_posts, &selection),
                filter_posts(&competitor_posts, &selection),
            ))
        }
    };

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use brandpulse_metrics::aggregate_instagram;

    use super::*;

    #[test]
    fn summary_serializes_without_a_platform_tag() {
        let pair = BrandPair {
            primary: aggregate_instagram([]),
            competitor: aggregate_instagram([]),
        };
        let json = serde_json::to_value(EngagementSummary::Instagram(pair)).expect("serialize");
        // Untagged: the pair's fields are the top level.
        assert!(json.get("primary").is_some());
        assert!(json.get("competitor").is_some());
        assert_eq!(json["primary"]["image_engagement"], 0);
    }
}
