//! Outbound generation gateway.
//!
//! Everything between a feature handler and the external text-generation
//! API lives here: the chat-completions client, the per-feature prompt
//! builders, the strictly-decoded content shapes with their hardcoded
//! stubs, the [`Generation`] outcome type that keeps "genuine success"
//! distinguishable from "degraded but served", and the injected result
//! cache.

mod cache;
mod client;
mod content;
mod error;
mod outcome;
pub mod prompts;
mod types;

pub use cache::{cache_key, CachePolicy, MemoryCache, ResultCache};
pub use client::OracleClient;
pub use content::{
    AstroFactor, AstroFactors, Forecast, Impact, PortfolioRoast, RetroPost, TokenRoast,
};
pub use error::OracleError;
pub use outcome::Generation;

/// Runs the generation-and-normalization step of the pipeline: ask the
/// oracle for a JSON-shaped reply, strictly decode it, and degrade to the
/// supplied stub on any failure.
///
/// The caller always receives a usable value; the [`Generation`] wrapper
/// records whether it was genuinely generated.
pub async fn generate_or_stub<T, F>(
    client: &OracleClient,
    system: &str,
    prompt: &str,
    stub: F,
) -> Generation<T>
where
    T: serde::de::DeserializeOwned,
    F: FnOnce() -> T,
{
    match client.complete_json::<T>(system, prompt).await {
        Ok(value) => Generation::Generated(value),
        Err(error) => {
            tracing::warn!(error = %error, "generation failed, serving stub content");
            Generation::Fallback {
                value: stub(),
                error,
            }
        }
    }
}
