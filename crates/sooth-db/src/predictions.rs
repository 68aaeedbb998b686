//! Database operations for the `predictions` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `predictions` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PredictionRow {
    pub id: i64,
    pub public_id: Uuid,
    pub asset_id: String,
    pub asset_name: String,
    pub asset_symbol: String,
    pub price_usd: f64,
    pub forecast: String,
    pub confidence: i16,
    pub analysis: String,
    pub degraded: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a new `predictions` row.
#[derive(Debug)]
pub struct NewPrediction<'a> {
    pub asset_id: &'a str,
    pub asset_name: &'a str,
    pub asset_symbol: &'a str,
    pub price_usd: f64,
    pub forecast: &'a str,
    pub confidence: i16,
    pub analysis: &'a str,
    pub degraded: bool,
}

const SELECT_COLUMNS: &str = "id, public_id, asset_id, asset_name, asset_symbol, price_usd, \
                              forecast, confidence, analysis, degraded, created_at";

/// Insert a prediction and return the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_prediction(
    pool: &PgPool,
    prediction: &NewPrediction<'_>,
) -> Result<PredictionRow, DbError> {
    let row = sqlx::query_as::<_, PredictionRow>(
        "INSERT INTO predictions \
           (public_id, asset_id, asset_name, asset_symbol, price_usd, \
            forecast, confidence, analysis, degraded) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING id, public_id, asset_id, asset_name, asset_symbol, price_usd, \
                   forecast, confidence, analysis, degraded, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(prediction.asset_id)
    .bind(prediction.asset_name)
    .bind(prediction.asset_symbol)
    .bind(prediction.price_usd)
    .bind(prediction.forecast)
    .bind(prediction.confidence)
    .bind(prediction.analysis)
    .bind(prediction.degraded)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// List the most recent predictions, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure.
pub async fn list_predictions(pool: &PgPool, limit: i64) -> Result<Vec<PredictionRow>, DbError> {
    Ok(sqlx::query_as::<_, PredictionRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM predictions ORDER BY created_at DESC, id DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?)
}

/// Fetch one prediction by its public id, or `None` if absent.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure.
pub async fn get_prediction(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<PredictionRow>, DbError> {
    Ok(sqlx::query_as::<_, PredictionRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM predictions WHERE public_id = $1"
    ))
    .bind(public_id)
    .fetch_optional(pool)
    .await?)
}
