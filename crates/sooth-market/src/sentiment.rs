//! Client for the public fear/greed sentiment index.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::MarketError;
use crate::types::{FearGreedReading, FearGreedResponse};

const DEFAULT_BASE_URL: &str = "https://api.alternative.me";

/// Client for the Alternative.me fear & greed index.
pub struct FearGreedClient {
    client: Client,
    base_url: Url,
}

impl FearGreedClient {
    /// Creates a new client pointed at the production index.
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

    /// Fetches the latest fear/greed reading.
    ///
    /// # Errors
    ///
    /// - [`MarketError::Http`] on network failure or non-2xx HTTP status.
    /// - [`MarketError::Deserialize`] if the response does not match the
    ///   expected shape, or the reading list is empty.
    pub async fn latest(&self) -> Result<FearGreedReading, MarketError> {
        let url = self
            .base_url
            .join("fng/")
            .unwrap_or_else(|_| self.base_url.clone());
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let parsed: FearGreedResponse =
            serde_json::from_str(&body).map_err(|e| MarketError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;
        parsed
            .data
            .into_iter()
            .next()
            .ok_or_else(|| MarketError::Config("fear/greed response carried no readings".into()))
    }
}
