//! Integration tests for the market-data clients using wiremock HTTP mocks.

use sooth_market::{FearGreedClient, MarketClient, MarketError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> MarketClient {
    MarketClient::with_base_url(10, base_url).expect("client construction should not fail")
}

#[tokio::test]
async fn list_quotes_parses_provider_payload() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "id": "bitcoin", "name": "Bitcoin", "symbol": "btc", "current_price": 45123.5 },
        { "id": "deadcoin", "name": "Dead Coin", "symbol": "rip", "current_price": null }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/v3/coins/markets"))
        .and(query_param("vs_currency", "usd"))
        .and(query_param("order", "market_cap_desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let quotes = test_client(&server.uri())
        .list_quotes()
        .await
        .expect("should parse quotes");

    assert_eq!(quotes.len(), 2);
    assert_eq!(quotes[0].id, "bitcoin");
    assert!((quotes[0].price_usd() - 45_123.5).abs() < f64::EPSILON);
    assert!(quotes[1].current_price.is_none());
}

#[tokio::test]
async fn get_asset_detail_parses_ath_fields() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "id": "bitcoin",
        "name": "Bitcoin",
        "symbol": "btc",
        "market_data": {
            "current_price": { "usd": 43000.0 },
            "ath": { "usd": 69000.0 },
            "ath_date": { "usd": "2021-11-10T14:24:11.849Z" },
            "price_change_percentage_24h": -2.3
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/v3/coins/bitcoin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let detail = test_client(&server.uri())
        .get_asset_detail("bitcoin")
        .await
        .expect("should parse detail");

    assert!((detail.ath_usd() - 69_000.0).abs() < f64::EPSILON);
    assert!((detail.current_price_usd() - 43_000.0).abs() < f64::EPSILON);
    let ath_date = detail.market_data.ath_date.usd.expect("ath date present");
    assert_eq!(ath_date.date_naive().to_string(), "2021-11-10");
}

#[tokio::test]
async fn daily_series_collapses_timestamp_pairs() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "prices": [
            [1_700_000_000_000_u64, 36000.0],
            [1_700_086_400_000_u64, 36500.0],
            [1_700_172_800_000_u64, 36250.0]
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/v3/coins/bitcoin/market_chart"))
        .and(query_param("vs_currency", "usd"))
        .and(query_param("days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let series = test_client(&server.uri())
        .daily_series("bitcoin", 7)
        .await
        .expect("should parse series");

    assert_eq!(series.len(), 3);
    assert!((series[1].price - 36_500.0).abs() < f64::EPSILON);
    assert!(series[0].date <= series[2].date);
}

#[tokio::test]
async fn provider_500_surfaces_as_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/coins/markets"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .list_quotes()
        .await
        .expect_err("500 should be an error");
    assert!(matches!(err, MarketError::Http(_)));
}

#[tokio::test]
async fn non_json_body_surfaces_as_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/coins/markets"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .list_quotes()
        .await
        .expect_err("non-JSON should be an error");
    assert!(matches!(err, MarketError::Deserialize { .. }));
}

#[tokio::test]
async fn quotes_or_fallback_serves_hardcoded_list_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/coins/markets"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let quotes = sooth_market::quotes_or_fallback(&test_client(&server.uri())).await;
    assert_eq!(quotes.len(), 5);
    assert!(quotes.iter().any(|q| q.id == "bitcoin"));
}

#[tokio::test]
async fn series_degrades_to_synthetic_of_requested_length() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/coins/bitcoin/market_chart"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (series, synthetic) = sooth_market::daily_series_or_synthetic(
        &test_client(&server.uri()),
        "bitcoin",
        30,
        sooth_core::DataPolicy::Live,
    )
    .await;

    assert!(synthetic);
    assert_eq!(series.len(), 30);
}

#[tokio::test]
async fn synthetic_policy_never_contacts_the_provider() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (series, synthetic) = sooth_market::daily_series_or_synthetic(
        &test_client(&server.uri()),
        "bitcoin",
        7,
        sooth_core::DataPolicy::Synthetic,
    )
    .await;

    assert!(synthetic);
    assert_eq!(series.len(), 7);
}

#[tokio::test]
async fn fear_greed_latest_parses_stringly_typed_value() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "name": "Fear and Greed Index",
        "data": [
            { "value": "72", "value_classification": "Greed", "timestamp": "1717632000" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/fng/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let reading = FearGreedClient::with_base_url(10, &server.uri())
        .expect("client construction should not fail")
        .latest()
        .await
        .expect("should parse reading");

    assert_eq!(reading.value_number(), Some(72));
    assert_eq!(reading.value_classification, "Greed");
}
