//! Retroactive "genius" posts: market calls written today, dated six months
//! before the peak.

use axum::{extract::State, Extension, Json};
use chrono::{Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sooth_oracle::{cache_key, prompts, CachePolicy, Generation, RetroPost};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct RetroRequest {
    pub asset_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RetroPostItem {
    pub posted_on: String,
    pub title: String,
    pub body: String,
    pub indicators: Vec<String>,
    pub signature: String,
    pub follow_up: String,
    pub current_price: f64,
    pub peak_price: f64,
    pub degraded: bool,
}

/// Price context for the post: fetched when possible, improvised otherwise.
struct PeakContext {
    asset_name: String,
    current_price: f64,
    peak_price: f64,
    posted_on: String,
}

/// POST /api/v1/retro/generate — fabricate a prophetic post from the past.
pub(super) async fn generate_retro_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RetroRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = req_id.0;

    let Some(asset_id) = body
        .asset_id
        .map(|id| id.trim().to_lowercase())
        .filter(|id| !id.is_empty())
    else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "asset_id is required — even a time machine needs minimal input",
        ));
    };

    let key = cache_key("retro", &[&asset_id]);
    if let Some(cached) = state.cache.get(&key) {
        tracing::debug!(key, "retro post served from cache");
        return Ok(Json(ApiResponse {
            data: cached,
            meta: ResponseMeta::new(rid),
        }));
    }

    let context = peak_context(&state, &asset_id).await;

    let prompt = prompts::retro_post(&context.asset_name, &context.posted_on, context.peak_price);
    let generation: Generation<RetroPost> =
        sooth_oracle::generate_or_stub(&state.oracle, prompts::RETRO_SYSTEM, &prompt, || {
            RetroPost::stub(&context.asset_name)
        })
        .await;

    let degraded = generation.is_fallback();
    let (post, error) = generation.into_parts();

    let item = RetroPostItem {
        posted_on: context.posted_on,
        title: post.title,
        body: post.body,
        indicators: post.indicators,
        signature: post.signature,
        follow_up: post.follow_up,
        current_price: context.current_price,
        peak_price: context.peak_price,
        degraded,
    };
    let payload = serde_json::to_value(&item).unwrap_or_default();

    if let Some(error) = error {
        return Err(ApiError::new(
            rid,
            "generation_failed",
            "our time machine is temporarily out of order",
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

/// Fetches the asset's peak data, improvising a plausible stand-in when the
/// provider has nothing for us.
async fn peak_context(state: &AppState, asset_id: &str) -> PeakContext {
    match state.market.get_asset_detail(asset_id).await {
        Ok(detail) => {
            let ath_date = detail
                .market_data
                .ath_date
                .usd
                .unwrap_or_else(|| fixed_utc(2021, 1, 1));
            PeakContext {
                asset_name: detail.name.clone(),
                current_price: detail.current_price_usd(),
                peak_price: detail.ath_usd(),
                posted_on: posted_on_before(ath_date),
            }
        }
        Err(e) => {
            tracing::warn!(asset_id, error = %e, "asset detail unavailable, improvising peak data");
            PeakContext {
                asset_name: capitalize(asset_id),
                current_price: 1_000.0,
                peak_price: 5_000.0,
                posted_on: posted_on_before(fixed_utc(2021, 11, 10)),
            }
        }
    }
}

fn fixed_utc(year: i32, month: u32, day: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// The post is "published" six months before the peak, rendered DD-MM-YYYY.
fn posted_on_before(ath_date: chrono::DateTime<Utc>) -> String {
    let posted = ath_date
        .checked_sub_months(Months::new(6))
        .unwrap_or(ath_date);
    posted.format("%d-%m-%Y").to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posted_on_lands_six_months_before_the_peak() {
        let ath = Utc.with_ymd_and_hms(2021, 11, 10, 14, 24, 11).unwrap();
        assert_eq!(posted_on_before(ath), "10-05-2021");
    }

    #[test]
    fn capitalize_handles_empty_and_ascii() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("bitcoin"), "Bitcoin");
        assert_eq!(capitalize("x"), "X");
    }
}
