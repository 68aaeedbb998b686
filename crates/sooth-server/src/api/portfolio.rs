//! Merciless portfolio review: validate, roast, persist, remember.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sooth_core::PortfolioHolding;
use sooth_oracle::{cache_key, prompts, CachePolicy, Generation, PortfolioRoast};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeRequest {
    pub portfolio: Option<Vec<PortfolioHolding>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalysisItem {
    pub id: Uuid,
    pub holdings: serde_json::Value,
    pub overall_roast: String,
    pub token_roasts: serde_json::Value,
    pub alternate_universe: String,
    pub degraded: bool,
    pub created_at: DateTime<Utc>,
}

impl From<sooth_db::PortfolioAnalysisRow> for AnalysisItem {
    fn from(row: sooth_db::PortfolioAnalysisRow) -> Self {
        Self {
            id: row.public_id,
            holdings: row.holdings,
            overall_roast: row.overall_roast,
            token_roasts: row.token_roasts,
            alternate_universe: row.alternate_universe,
            degraded: row.degraded,
            created_at: row.created_at,
        }
    }
}

/// POST /api/v1/portfolio/analyze — roast the submitted holdings.
pub(super) async fn analyze_portfolio(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = req_id.0;

    let Some(holdings) = body.portfolio.filter(|p| !p.is_empty()) else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "portfolio must be a non-empty list of holdings — if you own no crypto, \
             congratulations, you may be smarter than most of our users",
        ));
    };

    // Content-addressed key: the same confession earns the same roast.
    let holdings_json = serde_json::to_value(&holdings).unwrap_or_default();
    let key = cache_key("portfolio", &[&holdings_json.to_string()]);
    if let Some(cached) = state.cache.get(&key) {
        tracing::debug!("portfolio analysis served from cache");
        return Ok(Json(ApiResponse {
            data: cached,
            meta: ResponseMeta::new(rid),
        }));
    }

    let prompt = prompts::portfolio_roast(&holdings);
    let generation: Generation<PortfolioRoast> =
        sooth_oracle::generate_or_stub(&state.oracle, prompts::ROAST_SYSTEM, &prompt, || {
            PortfolioRoast::stub(&holdings)
        })
        .await;

    let degraded = generation.is_fallback();
    let (roast, error) = generation.into_parts();
    let token_roasts = serde_json::to_value(&roast.token_roasts).unwrap_or_default();

    let new_row = sooth_db::NewPortfolioAnalysis {
        holdings: &holdings_json,
        overall_roast: &roast.overall_roast,
        token_roasts: &token_roasts,
        alternate_universe: &roast.alternate_universe,
        degraded,
    };

    let (id, created_at) = match sooth_db::insert_portfolio_analysis(&state.pool, &new_row).await {
        Ok(row) => (row.public_id, row.created_at),
        Err(e) => {
            tracing::warn!(error = %e, "failed to persist portfolio analysis, serving unsaved result");
            (Uuid::new_v4(), Utc::now())
        }
    };

    let item = AnalysisItem {
        id,
        holdings: holdings_json,
        overall_roast: roast.overall_roast,
        token_roasts,
        alternate_universe: roast.alternate_universe,
        degraded,
        created_at,
    };
    let payload = serde_json::to_value(&item).unwrap_or_default();

    if let Some(error) = error {
        return Err(ApiError::new(
            rid,
            "generation_failed",
            "your portfolio may be so bad it broke our analyst",
        )
        .with_detail_if(state.settings.expose_errors, error.to_string())
        .with_fallback(payload));
    }

    state
        .cache
        .put(&key, payload.clone(), CachePolicy::Ttl(state.settings.cache_ttl));

    Ok(Json(ApiResponse {
        data: payload,
        meta: ResponseMeta::new(rid),
    }))
}

/// GET /api/v1/portfolio/history — most recent analyses, newest first.
pub(super) async fn list_history(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<AnalysisItem>>>, ApiError> {
    let rows = sooth_db::list_portfolio_analyses(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(AnalysisItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}
