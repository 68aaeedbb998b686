use thiserror::Error;

/// Errors returned by the market-data clients.
#[derive(Debug, Error)]
pub enum MarketError {
    /// Network or TLS failure from the underlying HTTP client, or a non-2xx
    /// status from the provider.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Client misconfiguration, e.g. an unparseable base URL.
    #[error("market client error: {0}")]
    Config(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
