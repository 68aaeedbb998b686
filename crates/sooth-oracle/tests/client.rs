//! Integration tests for `OracleClient` using wiremock HTTP mocks.

use sooth_oracle::{generate_or_stub, Forecast, OracleClient, OracleError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OracleClient {
    OracleClient::with_base_url(Some("sk-test".to_owned()), "gpt-3.5-turbo", 30, base_url)
        .expect("client construction should not fail")
}

fn chat_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn complete_json_decodes_a_wellformed_reply() {
    let server = MockServer::start().await;

    let content = r#"{"forecast": "Up, obviously.", "confidence": 97, "analysis": "Moon math."}"#;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-3.5-turbo",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(content)))
        .mount(&server)
        .await;

    let forecast: Forecast = test_client(&server.uri())
        .complete_json("system", "user")
        .await
        .expect("should decode");

    assert_eq!(forecast.confidence, 97);
    assert_eq!(forecast.forecast, "Up, obviously.");
}

#[tokio::test]
async fn non_json_content_is_a_malformed_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply("The stars say buy. Trust me, bro.")),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete_json::<Forecast>("system", "user")
        .await
        .expect_err("prose content must not decode");
    assert!(matches!(err, OracleError::MalformedReply { .. }));
}

#[tokio::test]
async fn missing_fields_are_a_malformed_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_reply(r#"{"forecast": "up"}"#)),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete_json::<Forecast>("system", "user")
        .await
        .expect_err("partial shapes must not decode");
    assert!(matches!(err, OracleError::MalformedReply { .. }));
}

#[tokio::test]
async fn api_error_body_surfaces_its_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": { "message": "Rate limit reached for requests", "type": "requests" }
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete("system", "user")
        .await
        .expect_err("429 must be an error");
    match err {
        OracleError::Api(message) => assert!(message.contains("Rate limit")),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_choice_list_is_an_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-123",
            "choices": []
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete("system", "user")
        .await
        .expect_err("no choices must be an error");
    assert!(matches!(err, OracleError::Api(_)));
}

#[tokio::test]
async fn generate_or_stub_passes_through_a_good_reply() {
    let server = MockServer::start().await;

    let content = r#"{"forecast": "Down.", "confidence": 12, "analysis": "Gravity."}"#;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(content)))
        .mount(&server)
        .await;

    let generation = generate_or_stub(&test_client(&server.uri()), "sys", "user", || {
        Forecast::stub("Bitcoin")
    })
    .await;

    assert!(!generation.is_fallback());
    assert_eq!(generation.value().confidence, 12);
}

#[tokio::test]
async fn generate_or_stub_degrades_to_the_stub_on_upstream_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let generation = generate_or_stub(&test_client(&server.uri()), "sys", "user", || {
        Forecast::stub("Bitcoin")
    })
    .await;

    assert!(generation.is_fallback());
    let (value, error) = generation.into_parts();
    assert!(value.forecast.contains("Bitcoin"));
    assert!(error.is_some());
}

#[tokio::test]
async fn keyless_client_never_contacts_the_api() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client =
        OracleClient::with_base_url(None, "gpt-3.5-turbo", 30, &server.uri()).expect("client");
    let generation =
        generate_or_stub(&client, "sys", "user", || Forecast::stub("Ethereum")).await;

    assert!(generation.is_fallback());
}
