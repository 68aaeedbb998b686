//! The flagship feature: satirical price predictions, persisted as
//! immutable history.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sooth_core::AssetQuote;
use sooth_oracle::{cache_key, prompts, CachePolicy, Forecast, Generation};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateRequest {
    /// The asset to predict. When omitted, a victim is chosen at random
    /// among the top of the market.
    pub asset: Option<AssetQuote>,
}

#[derive(Debug, Serialize)]
pub(super) struct PredictionItem {
    pub id: Uuid,
    pub asset_id: String,
    pub asset_name: String,
    pub asset_symbol: String,
    pub price_usd: f64,
    pub forecast: String,
    pub confidence: i16,
    pub analysis: String,
    pub degraded: bool,
    pub created_at: DateTime<Utc>,
}

impl From<sooth_db::PredictionRow> for PredictionItem {
    fn from(row: sooth_db::PredictionRow) -> Self {
        Self {
            id: row.public_id,
            asset_id: row.asset_id,
            asset_name: row.asset_name,
            asset_symbol: row.asset_symbol,
            price_usd: row.price_usd,
            forecast: row.forecast,
            confidence: row.confidence,
            analysis: row.analysis,
            degraded: row.degraded,
            created_at: row.created_at,
        }
    }
}

/// GET /api/v1/predictions — most recent persisted predictions.
pub(super) async fn list_predictions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<PredictionItem>>>, ApiError> {
    let rows = sooth_db::list_predictions(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(PredictionItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/predictions/{id} — one prediction by public id.
pub(super) async fn get_prediction(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PredictionItem>>, ApiError> {
    let row = sooth_db::get_prediction(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    match row {
        Some(row) => Ok(Json(ApiResponse {
            data: PredictionItem::from(row),
            meta: ResponseMeta::new(req_id.0),
        })),
        None => Err(ApiError::new(
            req_id.0,
            "not_found",
            "prediction not found — it vanished like your gains in a bear market",
        )),
    }
}

/// POST /api/v1/predictions/generate — run the pipeline for one asset.
pub(super) async fn generate_prediction(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), ApiError> {
    let rid = req_id.0;

    let asset = match body.asset {
        Some(asset) if !asset.id.trim().is_empty() => asset,
        Some(_) => {
            return Err(ApiError::new(
                rid,
                "validation_error",
                "asset.id must not be empty",
            ));
        }
        None => pick_random_asset(&state).await,
    };

    let key = cache_key("prediction", &[&asset.id]);
    if let Some(cached) = state.cache.get(&key) {
        tracing::debug!(key, "prediction served from cache");
        return Ok((
            StatusCode::OK,
            Json(ApiResponse {
                data: cached,
                meta: ResponseMeta::new(rid),
            }),
        ));
    }

    let prompt = prompts::forecast(&asset.name, &asset.symbol, asset.price_usd());
    let generation: Generation<Forecast> =
        sooth_oracle::generate_or_stub(&state.oracle, prompts::FORECAST_SYSTEM, &prompt, || {
            Forecast::stub(&asset.name)
        })
        .await
        .map(Forecast::normalized);

    let degraded = generation.is_fallback();
    let (forecast, error) = generation.into_parts();

    let new_row = sooth_db::NewPrediction {
        asset_id: &asset.id,
        asset_name: &asset.name,
        asset_symbol: &asset.symbol,
        price_usd: asset.price_usd(),
        forecast: &forecast.forecast,
        confidence: forecast.confidence,
        analysis: &forecast.analysis,
        degraded,
    };

    // Write failures are logged, never fatal: the forecast is already
    // computed and the caller still gets it.
    let (id, created_at) = match sooth_db::insert_prediction(&state.pool, &new_row).await {
        Ok(row) => (row.public_id, row.created_at),
        Err(e) => {
            tracing::warn!(error = %e, "failed to persist prediction, serving unsaved result");
            (Uuid::new_v4(), Utc::now())
        }
    };

    let price_usd = asset.price_usd();
    let item = PredictionItem {
        id,
        asset_id: asset.id,
        asset_name: asset.name,
        asset_symbol: asset.symbol,
        price_usd,
        forecast: forecast.forecast,
        confidence: forecast.confidence,
        analysis: forecast.analysis,
        degraded,
        created_at,
    };
    let payload = serde_json::to_value(&item).unwrap_or_default();

    if let Some(error) = error {
        return Err(ApiError::new(
            rid,
            "generation_failed",
            "the oracle is as unreliable as Reddit advice today",
        )
        .with_detail_if(state.settings.expose_errors, error.to_string())
        .with_fallback(payload));
    }

    // Only genuine generations are worth pinning for the rest of the day.
    state
        .cache
        .put(&key, payload.clone(), CachePolicy::CalendarDay);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: payload,
            meta: ResponseMeta::new(rid),
        }),
    ))
}

/// Picks a random victim among the top 20 quotes (or the fallback list).
async fn pick_random_asset(state: &AppState) -> AssetQuote {
    let quotes = sooth_market::quotes_or_fallback(&state.market).await;
    let pool_size = quotes.len().min(20).max(1);
    let index = rand::rng().random_range(0..pool_size);
    quotes
        .into_iter()
        .nth(index)
        .unwrap_or_else(|| sooth_market::fallback_quotes().remove(0))
}
