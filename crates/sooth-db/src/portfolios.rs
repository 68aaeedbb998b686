//! Database operations for the `portfolio_analyses` table.
//!
//! `holdings` and `token_roasts` are stored as JSONB: the holdings echo the
//! caller's input verbatim and the roasts keep the generator's per-token
//! structure without a join table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `portfolio_analyses` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PortfolioAnalysisRow {
    pub id: i64,
    pub public_id: Uuid,
    pub holdings: Value,
    pub overall_roast: String,
    pub token_roasts: Value,
    pub alternate_universe: String,
    pub degraded: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a new `portfolio_analyses` row.
#[derive(Debug)]
pub struct NewPortfolioAnalysis<'a> {
    pub holdings: &'a Value,
    pub overall_roast: &'a str,
    pub token_roasts: &'a Value,
    pub alternate_universe: &'a str,
    pub degraded: bool,
}

/// Insert a portfolio analysis and return the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_portfolio_analysis(
    pool: &PgPool,
    analysis: &NewPortfolioAnalysis<'_>,
) -> Result<PortfolioAnalysisRow, DbError> {
    let row = sqlx::query_as::<_, PortfolioAnalysisRow>(
        "INSERT INTO portfolio_analyses \
           (public_id, holdings, overall_roast, token_roasts, alternate_universe, degraded) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, public_id, holdings, overall_roast, token_roasts, \
                   alternate_universe, degraded, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(analysis.holdings)
    .bind(analysis.overall_roast)
    .bind(analysis.token_roasts)
    .bind(analysis.alternate_universe)
    .bind(analysis.degraded)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// List the most recent portfolio analyses, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] on query failure.
pub async fn list_portfolio_analyses(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<PortfolioAnalysisRow>, DbError> {
    Ok(sqlx::query_as::<_, PortfolioAnalysisRow>(
        "SELECT id, public_id, holdings, overall_roast, token_roasts, \
                alternate_universe, degraded, created_at \
         FROM portfolio_analyses \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?)
}
