use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use sooth_core::AssetQuote;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AssetsQuery {
    pub start: Option<usize>,
    pub limit: Option<usize>,
}

/// GET /api/v1/assets — current quotes, sliced for pagination.
///
/// Always answers: a provider outage degrades to the hardcoded fallback
/// list inside the market gateway.
pub(super) async fn list_assets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AssetsQuery>,
) -> Json<ApiResponse<Vec<AssetQuote>>> {
    let start = query.start.unwrap_or(0);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let quotes = sooth_market::quotes_or_fallback(&state.market).await;
    let data: Vec<AssetQuote> = quotes.into_iter().skip(start).take(limit).collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}
