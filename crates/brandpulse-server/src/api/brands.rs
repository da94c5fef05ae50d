use axum::{extract::State, Extension, Json};
use serde::Serialize;

use brandpulse_core::Platform;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct BrandItem {
    pub name: String,
    pub slug: String,
    pub role: String,
    /// Platforms this brand has a row source mapped for.
    pub platforms: Vec<String>,
    pub notes: Option<String>,
}

pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<BrandItem>>>, ApiError> {
    let data = state
        .brands
        .brands
        .iter()
        .map(|brand| {
            let platforms = Platform::ALL
                .iter()
                .filter(|p| brand.sheet_for(**p).is_some())
                .map(ToString::to_string)
                .collect();
            BrandItem {
                name: brand.name.clone(),
                slug: brand.slug(),
                role: brand.role.to_string(),
                platforms,
                notes: brand.notes.clone(),
            }
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
