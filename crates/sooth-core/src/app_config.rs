use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where chart endpoints source their price series from.
///
/// `Live` fetches from the market provider and falls back to synthetic data
/// on failure; `Synthetic` skips the provider entirely, which keeps demos
/// working offline without burning provider quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataPolicy {
    Live,
    Synthetic,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub generation_api_key: Option<String>,
    pub generation_base_url: String,
    pub generation_model: String,
    pub generation_timeout_secs: u64,
    pub market_base_url: String,
    pub market_timeout_secs: u64,
    pub sentiment_base_url: String,
    pub data_policy: DataPolicy,
    pub cache_ttl_secs: u64,
    pub rate_limit_per_minute: usize,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "generation_api_key",
                &self.generation_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("generation_base_url", &self.generation_base_url)
            .field("generation_model", &self.generation_model)
            .field("generation_timeout_secs", &self.generation_timeout_secs)
            .field("market_base_url", &self.market_base_url)
            .field("market_timeout_secs", &self.market_timeout_secs)
            .field("sentiment_base_url", &self.sentiment_base_url)
            .field("data_policy", &self.data_policy)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
