//! Astrological price charts: a real (or synthetic) price series decorated
//! with celestial nonsense, plus three generated "factors".

use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sooth_core::Timeframe;
use sooth_oracle::{cache_key, prompts, AstroFactor, AstroFactors, CachePolicy, Generation};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ChartRequest {
    pub asset_id: Option<String>,
    pub timeframe: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ChartPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub moon_influence: f64,
    pub mars_energy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub astro_event: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(super) struct AstrologyChart {
    pub asset_id: String,
    pub timeframe: Timeframe,
    pub series_source: &'static str,
    pub chart_data: Vec<ChartPoint>,
    pub astrological_factors: Vec<AstroFactor>,
    pub degraded: bool,
}

const ASTRO_EVENTS: &[&str] = &[
    "Planetary alignment",
    "Solar eclipse",
    "Lunar paradox",
    "Mercury retrograde",
    "Jovian impulse",
    "Venusian harmonization",
    "Saturnine cycle",
    "Martian crossing",
    "Neptunian wave",
    "Plutonic transformation",
];

/// POST /api/v1/astrology/chart — consult the stars about a price series.
pub(super) async fn generate_chart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ChartRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = req_id.0;

    let (Some(asset_id), Some(timeframe_raw)) = (
        body.asset_id
            .map(|id| id.trim().to_lowercase())
            .filter(|id| !id.is_empty()),
        body.timeframe.filter(|tf| !tf.trim().is_empty()),
    ) else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "asset_id and timeframe are required — the stars cannot predict without context \
             (timeframe: week, month, quarter, year)",
        ));
    };

    let Ok(timeframe) = timeframe_raw.parse::<Timeframe>() else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!("unknown timeframe '{timeframe_raw}', expected week, month, quarter, or year"),
        ));
    };

    let key = cache_key("astro", &[&asset_id, timeframe.as_str()]);
    if let Some(cached) = state.cache.get(&key) {
        tracing::debug!(key, "astrology chart served from cache");
        return Ok(Json(ApiResponse {
            data: cached,
            meta: ResponseMeta::new(rid),
        }));
    }

    let (series, synthetic) = sooth_market::daily_series_or_synthetic(
        &state.market,
        &asset_id,
        timeframe.days(),
        state.settings.data_policy,
    )
    .await;
    let chart_data = decorate_series(&series);

    let prompt = prompts::astro_factors(&asset_id);
    let generation: Generation<AstroFactors> =
        sooth_oracle::generate_or_stub(&state.oracle, prompts::ASTRO_SYSTEM, &prompt, || {
            AstroFactors::stub()
        })
        .await
        .map(AstroFactors::normalized);

    let degraded = generation.is_fallback();
    let (factors, error) = generation.into_parts();

    let chart = AstrologyChart {
        asset_id,
        timeframe,
        series_source: if synthetic { "synthetic" } else { "live" },
        chart_data,
        astrological_factors: factors.factors,
        degraded,
    };
    let payload = serde_json::to_value(&chart).unwrap_or_default();

    if let Some(error) = error {
        return Err(ApiError::new(
            rid,
            "generation_failed",
            "the stars are not on our side today",
        )
        .with_detail_if(state.settings.expose_errors, error.to_string())
        .with_fallback(payload));
    }

    state
        .cache
        .put(&key, payload.clone(), CachePolicy::CalendarDay);

    Ok(Json(ApiResponse {
        data: payload,
        meta: ResponseMeta::new(rid),
    }))
}

/// Attaches the celestial pseudo-factors to every price point. Roughly one
/// point in ten gets a named astro event.
fn decorate_series(series: &[sooth_market::PricePoint]) -> Vec<ChartPoint> {
    let mut rng = rand::rng();
    series
        .iter()
        .map(|point| {
            let astro_event = if rng.random::<f64>() > 0.9 {
                Some(ASTRO_EVENTS[rng.random_range(0..ASTRO_EVENTS.len())])
            } else {
                None
            };
            ChartPoint {
                date: point.date,
                price: point.price,
                moon_influence: 40.0 + rng.random::<f64>() * 50.0,
                mars_energy: 30.0 + rng.random::<f64>() * 60.0,
                astro_event,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sooth_market::PricePoint;

    #[test]
    fn decoration_preserves_length_and_bounds() {
        let series: Vec<PricePoint> = (0..100)
            .map(|i| PricePoint {
                date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap() + chrono::Duration::days(i),
                price: 1_000.0,
            })
            .collect();

        let decorated = decorate_series(&series);
        assert_eq!(decorated.len(), 100);
        for point in &decorated {
            assert!((40.0..=90.0).contains(&point.moon_influence));
            assert!((30.0..=90.0).contains(&point.mars_energy));
        }
    }
}
