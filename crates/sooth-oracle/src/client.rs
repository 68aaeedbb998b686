//! HTTP client for an OpenAI-compatible chat-completions API.
//!
//! The client always requests a JSON-object reply and hands the raw content
//! string to a strict decode step; loosely-shaped replies never escape this
//! crate.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::OracleError;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "v1/chat/completions";

// High temperature on purpose: the product sells absurdity, not accuracy.
const TEMPERATURE: f32 = 0.9;

/// Client for the external text-generation API.
///
/// Constructed without an API key it still works — every call returns
/// [`OracleError::MissingApiKey`], which callers translate into stub
/// content. That keeps local development usable with no credentials.
pub struct OracleClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    model: String,
}

impl OracleClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<String>,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self, OracleError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`OracleError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: Option<String>,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("sooth/0.1 (satirical-forecasting)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| OracleError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key,
            model: model.to_owned(),
        })
    }

    /// Submits a system+user prompt pair and returns the reply content as a
    /// raw string.
    ///
    /// # Errors
    ///
    /// - [`OracleError::MissingApiKey`] when no key is configured.
    /// - [`OracleError::Api`] when the API answers with an error status or an
    ///   empty choice list.
    /// - [`OracleError::Http`] on network failure.
    /// - [`OracleError::MalformedReply`] if the response envelope itself is
    ///   not valid JSON.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, OracleError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(OracleError::MissingApiKey);
        };

        let url = self
            .base_url
            .join(COMPLETIONS_PATH)
            .unwrap_or_else(|_| self.base_url.clone());

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(OracleError::Api(extract_api_error(&body, status)));
        }

        let envelope: ChatResponse =
            serde_json::from_str(&body).map_err(|e| OracleError::MalformedReply {
                context: url.to_string(),
                source: e,
            })?;

        envelope
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| OracleError::Api("reply carried no choices".to_owned()))
    }

    /// [`OracleClient::complete`] followed by a strict decode of the reply
    /// content into `T`.
    ///
    /// # Errors
    ///
    /// Everything [`OracleClient::complete`] returns, plus
    /// [`OracleError::MalformedReply`] when the content is not the JSON
    /// shape we asked for (non-JSON text, missing fields, wrong types).
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<T, OracleError> {
        let content = self.complete(system, user).await?;
        serde_json::from_str(&content).map_err(|e| OracleError::MalformedReply {
            context: std::any::type_name::<T>().to_owned(),
            source: e,
        })
    }
}

/// Pulls the human-readable message out of an API error body, falling back
/// to the status line when the body is not the documented error envelope.
fn extract_api_error(body: &str, status: reqwest::StatusCode) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_fails_without_io() {
        let client = OracleClient::with_base_url(None, "gpt-3.5-turbo", 30, "http://localhost:9")
            .expect("client construction should not fail");
        let err = client
            .complete("sys", "user")
            .await
            .expect_err("completion without a key must fail");
        assert!(matches!(err, OracleError::MissingApiKey));
    }

    #[test]
    fn extract_api_error_prefers_upstream_message() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#;
        let msg = extract_api_error(body, reqwest::StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(msg, "Rate limit reached");
    }

    #[test]
    fn extract_api_error_falls_back_to_status() {
        let msg = extract_api_error("<html>bad gateway</html>", reqwest::StatusCode::BAD_GATEWAY);
        assert!(msg.contains("502"));
    }
}
