mod app_config;
mod config;
mod types;

pub use app_config::{AppConfig, DataPolicy, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{AssetQuote, PortfolioHolding, Timeframe, TimeframeParseError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
