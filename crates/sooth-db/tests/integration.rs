//! Integration tests for the persistence layer. Each test gets a fresh
//! database with migrations applied via `#[sqlx::test]`.

use serde_json::json;
use sooth_db::{NewPortfolioAnalysis, NewPrediction};

fn sample_prediction<'a>(asset_id: &'a str, forecast: &'a str) -> NewPrediction<'a> {
    NewPrediction {
        asset_id,
        asset_name: "Bitcoin",
        asset_symbol: "btc",
        price_usd: 45_000.0,
        forecast,
        confidence: 85,
        analysis: "Based on the immutable law of FOMO.",
        degraded: false,
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn insert_prediction_returns_stored_row(pool: sqlx::PgPool) {
    let row = sooth_db::insert_prediction(&pool, &sample_prediction("bitcoin", "To the moon."))
        .await
        .expect("insert should succeed");

    assert_eq!(row.asset_id, "bitcoin");
    assert_eq!(row.asset_symbol, "btc");
    assert_eq!(row.confidence, 85);
    assert!(!row.degraded);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_predictions_is_newest_first_and_limited(pool: sqlx::PgPool) {
    for i in 0..3 {
        let forecast = format!("forecast {i}");
        sooth_db::insert_prediction(&pool, &sample_prediction("bitcoin", &forecast))
            .await
            .expect("insert should succeed");
    }

    let rows = sooth_db::list_predictions(&pool, 2)
        .await
        .expect("list should succeed");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].forecast, "forecast 2");
    assert_eq!(rows[1].forecast, "forecast 1");
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_prediction_round_trips_by_public_id(pool: sqlx::PgPool) {
    let inserted = sooth_db::insert_prediction(&pool, &sample_prediction("solana", "Sideways."))
        .await
        .expect("insert should succeed");

    let fetched = sooth_db::get_prediction(&pool, inserted.public_id)
        .await
        .expect("get should succeed")
        .expect("row should exist");
    assert_eq!(fetched, inserted);

    let missing = sooth_db::get_prediction(&pool, uuid::Uuid::new_v4())
        .await
        .expect("get should succeed");
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn persisted_predictions_are_stable_across_reads(pool: sqlx::PgPool) {
    sooth_db::insert_prediction(&pool, &sample_prediction("dogecoin", "Much wow."))
        .await
        .expect("insert should succeed");

    let first = sooth_db::list_predictions(&pool, 10)
        .await
        .expect("list should succeed");
    let second = sooth_db::list_predictions(&pool, 10)
        .await
        .expect("list should succeed");
    assert_eq!(first, second, "history rows must be immutable");
}

#[sqlx::test(migrations = "../../migrations")]
async fn portfolio_analysis_round_trips_jsonb_fields(pool: sqlx::PgPool) {
    let holdings = json!([{"token": "DOGE", "amount": 10_000.0, "buy_price": 0.45}]);
    let token_roasts = json!([{"name": "DOGE", "roast": "Bought the top, held the bottom."}]);

    let inserted = sooth_db::insert_portfolio_analysis(
        &pool,
        &NewPortfolioAnalysis {
            holdings: &holdings,
            overall_roast: "A museum of bad decisions.",
            token_roasts: &token_roasts,
            alternate_universe: "You bought an index fund and slept well.",
            degraded: false,
        },
    )
    .await
    .expect("insert should succeed");

    assert_eq!(inserted.holdings, holdings);
    assert_eq!(inserted.token_roasts, token_roasts);

    let listed = sooth_db::list_portfolio_analyses(&pool, 10)
        .await
        .expect("list should succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], inserted);
}
