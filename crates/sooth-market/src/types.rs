use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Detailed view of a single asset, from the provider's per-coin endpoint.
///
/// Only the fields the pipeline consumes are modeled; the provider sends far
/// more.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetDetail {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_data: MarketData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketData {
    pub current_price: UsdValue,
    pub ath: UsdValue,
    pub ath_date: UsdDate,
    pub price_change_percentage_24h: Option<f64>,
}

/// The provider keys per-currency maps by currency code; we only read `usd`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsdValue {
    pub usd: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsdDate {
    pub usd: Option<DateTime<Utc>>,
}

impl AssetDetail {
    #[must_use]
    pub fn current_price_usd(&self) -> f64 {
        self.market_data.current_price.usd.unwrap_or(0.0)
    }

    #[must_use]
    pub fn ath_usd(&self) -> f64 {
        self.market_data.ath.usd.unwrap_or(0.0)
    }
}

/// One daily point of a price series, either fetched or synthesized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Wire shape of the provider's market-chart endpoint: `[timestamp_ms, price]`
/// pairs.
#[derive(Debug, Deserialize)]
pub(crate) struct MarketChartResponse {
    pub prices: Vec<(f64, f64)>,
}

/// One reading of the fear/greed index. The upstream serializes `value` as a
/// string.
#[derive(Debug, Clone, Deserialize)]
pub struct FearGreedReading {
    pub value: String,
    pub value_classification: String,
}

impl FearGreedReading {
    /// Index value parsed to a number, if the upstream sent a valid one.
    #[must_use]
    pub fn value_number(&self) -> Option<u8> {
        self.value.trim().parse().ok()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FearGreedResponse {
    pub data: Vec<FearGreedReading>,
}
