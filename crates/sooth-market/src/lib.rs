//! Outbound market-data gateway.
//!
//! Wraps the public price-data provider (CoinGecko-compatible) and the
//! fear/greed sentiment index behind typed clients, and provides the
//! degradation path the pipeline relies on: hardcoded fallback quotes and a
//! bounded-random-walk synthetic series, so downstream generation can always
//! proceed.

mod client;
mod error;
mod fallback;
mod sentiment;
mod types;

pub use client::MarketClient;
pub use error::MarketError;
pub use fallback::{daily_series_or_synthetic, fallback_quotes, quotes_or_fallback, synthetic_series};
pub use sentiment::FearGreedClient;
pub use types::{AssetDetail, FearGreedReading, PricePoint};
