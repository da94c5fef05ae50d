use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use brandpulse_core::Platform;
use brandpulse_store::refresh_brands;

use crate::middleware::RequestId;

use super::{parse_platform, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct RefreshQuery {
    /// Refresh a single platform; both when omitted.
    pub platform: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RefreshOutcome {
    pub platform: String,
    pub slug: String,
    pub post_count: usize,
}

pub(super) async fn trigger_refresh(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<ApiResponse<Vec<RefreshOutcome>>>, ApiError> {
    let platforms: Vec<Platform> = match query.platform.as_deref() {
        Some(raw) => vec![parse_platform(&req_id.0, raw)?],
        None => Platform::ALL.to_vec(),
    };

    let mut data = Vec::new();
    for platform in platforms {
        let outcomes = refresh_brands(
            &state.store,
            state.sheets.as_ref(),
            &state.brands.brands,
            platform,
        )
        .await;
        data.extend(outcomes.into_iter().map(|o| RefreshOutcome {
            platform: platform.to_string(),
            slug: o.slug,
            post_count: o.post_count,
        }));
    }

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
