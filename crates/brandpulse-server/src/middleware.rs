//! Request middleware for the dashboard API: request ids, bearer auth,
//! and a fixed-window rate limit.
//!
//! Rejections go through the same `{ error, meta { request_id } }`
//! envelope the handlers use, so a client sees one error shape no matter
//! which layer refused the request.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id carried through extensions. Echoed back on the response
/// header and stamped into every response envelope, success or error.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Bearer-token roster guarding the protected routes.
///
/// Tokens come from `BRANDPULSE_API_KEYS` (comma-separated). An empty or
/// missing roster disables auth in development and refuses startup in any
/// other environment.
#[derive(Debug, Clone)]
pub struct ApiKeyAuth {
    keys: Arc<HashSet<String>>,
    pub enabled: bool,
}

impl ApiKeyAuth {
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("BRANDPULSE_API_KEYS").unwrap_or_default();
        let keys: HashSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if keys.is_empty() {
            if is_development {
                tracing::warn!(
                    "BRANDPULSE_API_KEYS not set; bearer auth disabled in development environment"
                );
                return Ok(Self::disabled());
            }

            anyhow::bail!(
                "BRANDPULSE_API_KEYS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            keys: Arc::new(keys),
            enabled: true,
        })
    }

    fn disabled() -> Self {
        Self {
            keys: Arc::new(HashSet::new()),
            enabled: false,
        }
    }

    fn accepts(&self, token: &str) -> bool {
        self.keys.contains(token)
    }

    #[cfg(test)]
    fn with_keys<const N: usize>(keys: [&str; N]) -> Self {
        Self {
            keys: Arc::new(keys.iter().map(ToString::to_string).collect()),
            enabled: true,
        }
    }
}

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    used: usize,
}

/// Fixed-window request budget shared across all protected routes.
#[derive(Debug, Clone)]
pub struct RequestBudget {
    limit: usize,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RequestBudget {
    #[must_use]
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            current: Arc::new(Mutex::new(Window {
                opened_at: Instant::now(),
                used: 0,
            })),
        }
    }

    /// Consume one request from the current window, opening a fresh
    /// window first if the previous one has elapsed. False means the
    /// budget is spent.
    async fn try_consume(&self) -> bool {
        let mut window = self.current.lock().await;
        if window.opened_at.elapsed() >= self.window {
            window.opened_at = Instant::now();
            window.used = 0;
        }
        if window.used >= self.limit {
            return false;
        }
        window.used += 1;
        true
    }
}

/// Enveloped rejection reusing the id the request-id layer stored in
/// extensions. That layer is outermost, so the id is present on every
/// routed request.
fn reject(req: &Request, code: &str, message: &str) -> Response {
    let id = req
        .extensions()
        .get::<RequestId>()
        .map_or_else(|| "unknown".to_string(), |rid| rid.0.clone());
    ApiError::new(id, code, message).into_response()
}

/// Extracts or generates a request ID.
///
/// An incoming `x-request-id` header is honoured; otherwise a fresh
/// `UUIDv4` is generated. The id lands in request extensions as
/// [`RequestId`] and on the response as the `x-request-id` header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    res
}

/// Enforces bearer auth against the key roster when enabled.
pub async fn require_bearer_auth(
    State(auth): State<ApiKeyAuth>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    match extract_bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if auth.accepts(token) => next.run(req).await,
        _ => reject(&req, "unauthorized", "missing or invalid bearer token"),
    }
}

/// Refuses requests beyond the fixed-window budget.
pub async fn enforce_rate_limit(
    State(budget): State<RequestBudget>,
    req: Request,
    next: Next,
) -> Response {
    if budget.try_consume().await {
        next.run(req).await
    } else {
        reject(&req, "rate_limited", "rate limit exceeded")
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn extract_bearer_token_accepts_valid_header() {
        let header = HeaderValue::from_static("Bearer test-token");
        assert_eq!(extract_bearer_token(Some(&header)), Some("test-token"));
    }

    #[test]
    fn extract_bearer_token_rejects_non_bearer_header() {
        let header = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn extract_bearer_token_rejects_blank_token() {
        let header = HeaderValue::from_static("Bearer   ");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn key_roster_accepts_only_listed_tokens() {
        let auth = ApiKeyAuth::with_keys(["alpha", "beta"]);
        assert!(auth.accepts("alpha"));
        assert!(!auth.accepts("gamma"));
    }

    #[test]
    fn auth_disables_when_no_keys_in_dev() {
        std::env::remove_var("BRANDPULSE_API_KEYS");
        let auth = ApiKeyAuth::from_env(true).expect("dev should allow missing keys");
        assert!(!auth.enabled);
    }

    #[tokio::test]
    async fn rejection_carries_the_standard_error_envelope() {
        let mut req = Request::new(Body::empty());
        req.extensions_mut().insert(RequestId("req-42".to_string()));

        let res = reject(&req, "unauthorized", "missing or invalid bearer token");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(res.into_body(), 4096)
            .await
            .expect("body reads");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("body is json");
        assert_eq!(body["error"]["code"], "unauthorized");
        assert_eq!(body["meta"]["request_id"], "req-42");
    }

    #[tokio::test]
    async fn rate_limited_rejection_maps_to_429() {
        let req = Request::new(Body::empty());
        let res = reject(&req, "rate_limited", "rate limit exceeded");
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn budget_refuses_after_limit_within_window() {
        let budget = RequestBudget::new(2, Duration::from_secs(60));
        assert!(budget.try_consume().await);
        assert!(budget.try_consume().await);
        assert!(!budget.try_consume().await);
    }

    #[tokio::test]
    async fn budget_opens_a_fresh_window_after_expiry() {
        let budget = RequestBudget::new(1, Duration::from_millis(0));
        assert!(budget.try_consume().await);
        // The zero-length window has always elapsed, so each consume
        // starts a fresh window.
        assert!(budget.try_consume().await);
    }
}
