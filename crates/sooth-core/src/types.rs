use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One market-data snapshot for a single asset, as the price provider
/// reports it. Prices can be absent for delisted or illiquid coins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetQuote {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: Option<f64>,
}

impl AssetQuote {
    /// Price in USD, or zero when the provider reported none.
    #[must_use]
    pub fn price_usd(&self) -> f64 {
        self.current_price.unwrap_or(0.0).max(0.0)
    }
}

/// One position in a user-submitted portfolio, echoed verbatim into the
/// persisted analysis. Amount and buy price are optional because the browser
/// form does not require them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHolding {
    pub token: String,
    pub amount: Option<f64>,
    pub buy_price: Option<f64>,
}

/// Lookback window accepted by the chart endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Week,
    Month,
    Quarter,
    Year,
}

#[derive(Debug, Error)]
#[error("unknown timeframe '{0}', expected week, month, quarter, or year")]
pub struct TimeframeParseError(pub String);

impl Timeframe {
    /// Number of daily data points the window covers.
    #[must_use]
    pub fn days(self) -> u32 {
        match self {
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Quarter => 90,
            Timeframe::Year => 365,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Week => "week",
            Timeframe::Month => "month",
            Timeframe::Quarter => "quarter",
            Timeframe::Year => "year",
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "week" => Ok(Timeframe::Week),
            "month" => Ok(Timeframe::Month),
            "quarter" => Ok(Timeframe::Quarter),
            "year" => Ok(Timeframe::Year),
            _ => Err(TimeframeParseError(s.to_owned())),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeframe_parses_case_insensitively() {
        assert_eq!("Week".parse::<Timeframe>().unwrap(), Timeframe::Week);
        assert_eq!("MONTH".parse::<Timeframe>().unwrap(), Timeframe::Month);
        assert_eq!("quarter".parse::<Timeframe>().unwrap(), Timeframe::Quarter);
        assert_eq!("year".parse::<Timeframe>().unwrap(), Timeframe::Year);
    }

    #[test]
    fn timeframe_rejects_unknown_values() {
        let err = "fortnight".parse::<Timeframe>().unwrap_err();
        assert!(err.to_string().contains("fortnight"));
    }

    #[test]
    fn timeframe_maps_to_expected_day_counts() {
        assert_eq!(Timeframe::Week.days(), 7);
        assert_eq!(Timeframe::Month.days(), 30);
        assert_eq!(Timeframe::Quarter.days(), 90);
        assert_eq!(Timeframe::Year.days(), 365);
    }

    #[test]
    fn timeframe_serializes_lowercase() {
        let json = serde_json::to_string(&Timeframe::Quarter).expect("serialize");
        assert_eq!(json, "\"quarter\"");
    }

    #[test]
    fn asset_quote_price_defaults_to_zero() {
        let quote: AssetQuote = serde_json::from_str(
            r#"{"id":"deadcoin","name":"Dead Coin","symbol":"rip","current_price":null}"#,
        )
        .expect("deserialize");
        assert!((quote.price_usd() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn asset_quote_clamps_negative_prices() {
        let quote = AssetQuote {
            id: "glitch".to_owned(),
            name: "Glitch".to_owned(),
            symbol: "glt".to_owned(),
            current_price: Some(-3.5),
        };
        assert!((quote.price_usd() - 0.0).abs() < f64::EPSILON);
    }
}
