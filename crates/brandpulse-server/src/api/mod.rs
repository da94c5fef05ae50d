mod audience;
mod brands;
mod engagement;
mod hashtags;
mod refresh;
mod sentiment;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use brandpulse_core::{
    AppConfig, BrandsFile, DateRange, FilterSelection, MonthSelection, Platform,
};
use brandpulse_store::{PostStore, SheetClient};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, ApiKeyAuth, RequestBudget, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostStore>,
    pub sheets: Arc<SheetClient>,
    pub brands: Arc<BrandsFile>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    brand_count: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Clamp the hashtag "top N" query parameter to something sane.
pub(super) fn normalize_top_n(n: Option<usize>, default: usize) -> usize {
    n.unwrap_or(default).clamp(1, 50)
}

/// Parse the `platform` query value, mapping failure to `bad_request`.
pub(super) fn parse_platform(request_id: &str, raw: &str) -> Result<Platform, ApiError> {
    Platform::from_str(raw).map_err(|_| {
        ApiError::new(
            request_id.to_string(),
            "bad_request",
            format!("unknown platform '{raw}'; expected 'instagram' or 'tiktok'"),
        )
    })
}

/// Build the active filter from the raw month string and optional explicit
/// range bounds. Explicit bounds win; otherwise the month string decides:
/// the "all" sentinel maps to the configured span, a month name maps to that
/// calendar month of the current year.
pub(super) fn resolve_selection(
    request_id: &str,
    config: &AppConfig,
    platform: Platform,
    month: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<FilterSelection, ApiError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ApiError::new(
                request_id.to_string(),
                "bad_request",
                "end must not precede start",
            ));
        }
        return Ok(FilterSelection {
            platform,
            selected_month: month.to_string(),
            date_range: DateRange { start, end },
        });
    }

    let year = Utc::now().year();
    match MonthSelection::parse(month) {
        MonthSelection::AllMonths => {
            let range =
                DateRange::month_span(year, config.range_start_month, config.range_end_month)
                    .ok_or_else(|| {
                        ApiError::new(
                            request_id.to_string(),
                            "internal_error",
                            "configured month span is invalid",
                        )
                    })?;
            Ok(FilterSelection::all_months(platform, range))
        }
        MonthSelection::Named(name) => FilterSelection::named_month(platform, name, year)
            .ok_or_else(|| {
                ApiError::new(
                    request_id.to_string(),
                    "internal_error",
                    "month range construction failed",
                )
            }),
        MonthSelection::Unrecognized(raw) => Err(ApiError::new(
            request_id.to_string(),
            "bad_request",
            format!("unrecognized month selection '{raw}'"),
        )),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: ApiKeyAuth, budget: RequestBudget) -> Router<AppState> {
    Router::new()
        .route("/api/v1/brands", get(brands::list_brands))
        .route(
            "/api/v1/engagement/summary",
            get(engagement::engagement_summary),
        )
        .route("/api/v1/creators/top", get(audience::top_creators))
        .route(
            "/api/v1/regions/distribution",
            get(audience::region_distribution),
        )
        .route("/api/v1/hashtags/top", get(hashtags::top_hashtags))
        .route("/api/v1/hashtags/unified", get(hashtags::unified_hashtags))
        .route(
            "/api/v1/sentiment/distribution",
            get(sentiment::sentiment_distribution),
        )
        .route(
            "/api/v1/sentiment/by-date",
            get(sentiment::sentiment_by_date),
        )
        .route("/api/v1/refresh", post(refresh::trigger_refresh))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    budget,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: ApiKeyAuth, budget: RequestBudget) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, budget))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData {
                status: "ok",
                brand_count: state.brands.brands.len(),
            },
            meta,
        }),
    )
}

pub fn default_request_budget() -> RequestBudget {
    RequestBudget::new(120, Duration::from_secs(60))
}
