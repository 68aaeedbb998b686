//! HTTP client for the public price-data provider.
//!
//! Wraps `reqwest` with provider-specific URL construction and typed
//! deserialization. The provider is consumed read-only and anonymously; there
//! is no API key to manage.

use std::time::Duration;

use chrono::DateTime;
use reqwest::{Client, Url};
use sooth_core::AssetQuote;

use crate::error::MarketError;
use crate::types::{AssetDetail, MarketChartResponse, PricePoint};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com";

/// Client for a CoinGecko-compatible market-data API.
///
/// Use [`MarketClient::new`] for production or
/// [`MarketClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug)]
pub struct MarketClient {
    client: Client,
    base_url: Url,
}

impl MarketClient {
    /// Creates a new client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, MarketError> {
        Self::with_base_url(timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`MarketError::Config`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(timeout_secs: u64, base_url: &str) -> Result<Self, MarketError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sooth/0.1 (satirical-forecasting)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| MarketError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Fetches the current top-of-market quote list (up to 100 assets,
    /// ordered by market cap).
    ///
    /// # Errors
    ///
    /// - [`MarketError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MarketError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn list_quotes(&self) -> Result<Vec<AssetQuote>, MarketError> {
        let url = self.build_url(
            "api/v3/coins/markets",
            &[
                ("vs_currency", "usd"),
                ("order", "market_cap_desc"),
                ("per_page", "100"),
                ("page", "1"),
                ("sparkline", "false"),
            ],
        );
        self.request_json(&url).await
    }

    /// Fetches the detailed view of one asset (current price, all-time high
    /// and its date, 24h change).
    ///
    /// # Errors
    ///
    /// - [`MarketError::Http`] on network failure or non-2xx HTTP status —
    ///   including 404 for an unknown asset id.
    /// - [`MarketError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn get_asset_detail(&self, asset_id: &str) -> Result<AssetDetail, MarketError> {
        let url = self.build_url(&format!("api/v3/coins/{asset_id}"), &[]);
        self.request_json(&url).await
    }

    /// Fetches a daily price series covering the last `days` days and
    /// collapses the provider's `[timestamp_ms, price]` pairs into
    /// [`PricePoint`]s.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MarketError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn daily_series(
        &self,
        asset_id: &str,
        days: u32,
    ) -> Result<Vec<PricePoint>, MarketError> {
        let url = self.build_url(
            &format!("api/v3/coins/{asset_id}/market_chart"),
            &[("vs_currency", "usd"), ("days", &days.to_string())],
        );
        let chart: MarketChartResponse = self.request_json(&url).await?;

        #[allow(clippy::cast_possible_truncation)]
        let points = chart
            .prices
            .into_iter()
            .filter_map(|(ts_ms, price)| {
                DateTime::from_timestamp_millis(ts_ms as i64)
                    .map(|ts| PricePoint { date: ts.date_naive(), price })
            })
            .collect();
        Ok(points)
    }

    /// Builds the full request URL with percent-encoded query parameters.
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Url {
        // Paths are relative and the base ends with a slash, so join cannot
        // fail for the inputs this crate constructs.
        let mut url = self.base_url.join(path).unwrap_or_else(|_| self.base_url.clone());
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body as the expected type.
    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<T, MarketError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MarketError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
