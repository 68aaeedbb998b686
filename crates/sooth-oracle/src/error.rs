use thiserror::Error;

/// Errors returned by the generation-API client.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The generation API answered with an error status and message.
    #[error("generation API error: {0}")]
    Api(String),

    /// No API key is configured; every generation call degrades to stubs.
    #[error("no generation API key configured")]
    MissingApiKey,

    /// The reply arrived but its content is not the JSON shape we asked for.
    #[error("malformed generation reply for {context}: {source}")]
    MalformedReply {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
