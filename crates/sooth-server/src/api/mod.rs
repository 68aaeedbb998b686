mod assets;
mod astrology;
mod portfolio;
mod predictions;
mod retro;
mod trust;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use sooth_core::DataPolicy;
use sooth_market::{FearGreedClient, MarketClient};
use sooth_oracle::{OracleClient, ResultCache};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Knobs the handlers read per request.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeSettings {
    pub data_policy: DataPolicy,
    pub cache_ttl: Duration,
    /// Diagnostic detail in error bodies — development only.
    pub expose_errors: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub market: Arc<MarketClient>,
    pub sentiment: Arc<FearGreedClient>,
    pub oracle: Arc<OracleClient>,
    pub cache: Arc<dyn ResultCache>,
    pub settings: RuntimeSettings,
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
    /// A renderable stand-in payload, present when the failure happened
    /// after normalization produced one. The client is never left with
    /// nothing to show.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<serde_json::Value>,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    database: &'static str,
    confidence: String,
    prediction: &'static str,
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
                detail: None,
            },
            fallback: None,
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    /// Attaches the stand-in payload served alongside the error status.
    #[must_use]
    pub fn with_fallback(mut self, fallback: serde_json::Value) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Attaches diagnostic detail, but only when the environment allows it.
    #[must_use]
    pub fn with_detail_if(mut self, expose: bool, detail: impl Into<String>) -> Self {
        if expose {
            self.error.detail = Some(detail.into());
        }
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(10).clamp(1, 100)
}

pub(super) fn map_db_error(request_id: String, error: &sooth_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/assets", get(assets::list_assets))
        .route("/api/v1/predictions", get(predictions::list_predictions))
        .route(
            "/api/v1/predictions/generate",
            post(predictions::generate_prediction),
        )
        .route("/api/v1/predictions/{id}", get(predictions::get_prediction))
        .route(
            "/api/v1/portfolio/analyze",
            post(portfolio::analyze_portfolio),
        )
        .route("/api/v1/portfolio/history", get(portfolio::list_history))
        .route("/api/v1/retro/generate", post(retro::generate_retro_post))
        .route("/api/v1/astrology/chart", post(astrology::generate_chart))
        .route("/api/v1/trust-index", get(trust::current_trust_index))
        .route(
            "/api/v1/trust-index/history",
            get(trust::trust_index_history),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
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
    let confidence = format!("{}%", rand::rng().random_range(0..100));

    match sooth_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                    confidence,
                    prediction: "this message will vanish on the next page refresh",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                        confidence,
                        prediction: "our database is as reliable as our forecasts today",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests;
