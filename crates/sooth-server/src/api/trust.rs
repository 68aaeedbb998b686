//! The trust index: a contrarian sentiment indicator. Whatever the market
//! feels, we recommend the opposite.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum MarketSentiment {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(super) enum SentimentSource {
    FearGreed,
    BtcPrice,
    Random,
}

#[derive(Debug, Serialize)]
pub(super) struct ConfidenceFactor {
    pub name: &'static str,
    pub value: u8,
    pub trend: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct TrustIndex {
    pub index_value: u8,
    pub market_sentiment: MarketSentiment,
    pub recommendation: &'static str,
    pub confidence_factors: Vec<ConfidenceFactor>,
    pub sentiment_source: SentimentSource,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct HistoryQuery {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct HistoryPoint {
    pub date: NaiveDate,
    pub value: u8,
    pub market_sentiment: MarketSentiment,
}

/// GET /api/v1/trust-index — the current contrarian reading.
///
/// Sentiment resolution ladder: the fear/greed index, then bitcoin's 24h
/// move, then a coin flip — each step only when the previous source fails.
/// The payload reports which rung was used. Fresh randomness per request,
/// deliberately uncached.
pub(super) async fn current_trust_index(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<TrustIndex>> {
    let (sentiment, source) = resolve_sentiment(&state).await;
    let mut rng = rand::rng();

    let index_value = match source {
        SentimentSource::FearGreed => {
            rng.random_range(0..30)
                + if sentiment == MarketSentiment::Positive {
                    60
                } else {
                    10
                }
        }
        SentimentSource::BtcPrice | SentimentSource::Random => {
            rng.random_range(0..40)
                + if sentiment == MarketSentiment::Positive {
                    50
                } else {
                    10
                }
        }
    };

    let data = TrustIndex {
        index_value,
        market_sentiment: sentiment,
        recommendation: contrarian_recommendation(sentiment, index_value),
        confidence_factors: confidence_factors(&mut rng, sentiment),
        sentiment_source: source,
        generated_at: Utc::now(),
    };

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// GET /api/v1/trust-index/history — a synthetic daily record proving we
/// have always been wrong.
pub(super) async fn trust_index_history(
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<HistoryQuery>,
) -> Json<ApiResponse<Vec<HistoryPoint>>> {
    let days = query.days.unwrap_or(30).clamp(1, 365);
    let today = Utc::now().date_naive();
    let mut rng = rand::rng();

    let data = (0..days)
        .map(|i| HistoryPoint {
            date: today - Duration::days(days - i - 1),
            value: rng.random_range(0..100),
            market_sentiment: if rng.random::<bool>() {
                MarketSentiment::Positive
            } else {
                MarketSentiment::Negative
            },
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

async fn resolve_sentiment(state: &AppState) -> (MarketSentiment, SentimentSource) {
    match state.sentiment.latest().await {
        Ok(reading) => {
            let value = reading.value_number().unwrap_or(50);
            tracing::info!(
                value,
                classification = %reading.value_classification,
                "fear/greed index fetched"
            );
            let sentiment = if value > 50 {
                MarketSentiment::Positive
            } else {
                MarketSentiment::Negative
            };
            return (sentiment, SentimentSource::FearGreed);
        }
        Err(e) => {
            tracing::warn!(error = %e, "fear/greed index unavailable, trying bitcoin's 24h move");
        }
    }

    match state.market.get_asset_detail("bitcoin").await {
        Ok(detail) => {
            let change = detail.market_data.price_change_percentage_24h.unwrap_or(0.0);
            tracing::info!(change, "using bitcoin 24h change as sentiment");
            let sentiment = if change > 0.0 {
                MarketSentiment::Positive
            } else {
                MarketSentiment::Negative
            };
            (sentiment, SentimentSource::BtcPrice)
        }
        Err(e) => {
            tracing::warn!(error = %e, "bitcoin data unavailable too, flipping a coin");
            let sentiment = if rand::rng().random::<bool>() {
                MarketSentiment::Positive
            } else {
                MarketSentiment::Negative
            };
            (sentiment, SentimentSource::Random)
        }
    }
}

/// The recommendation is always the opposite of the crowd.
fn contrarian_recommendation(sentiment: MarketSentiment, index_value: u8) -> &'static str {
    match sentiment {
        MarketSentiment::Positive if index_value > 80 => {
            "Everyone is euphoric? Perfect time to panic and sell everything! When taxi \
             drivers start giving investment advice, the smart money is already packing."
        }
        MarketSentiment::Positive => {
            "The market is far too optimistic. Historically, that is an excellent leading \
             indicator of an incoming crash. Grab popcorn and watch the inevitable chaos."
        }
        MarketSentiment::Negative if index_value < 20 => {
            "Everyone is panic-selling? Great time to buy! Assuming you enjoy catching \
             falling knives and are not afraid to lose a little more money. Or a lot."
        }
        MarketSentiment::Negative => {
            "The market is depressed? By our contrarian logic that might be a buy signal. \
             Or not. Who knows? Certainly not us."
        }
    }
}

fn confidence_factors(
    rng: &mut impl Rng,
    sentiment: MarketSentiment,
) -> Vec<ConfidenceFactor> {
    vec![
        ConfidenceFactor {
            name: "FOMO index",
            value: rng.random_range(0..100),
            trend: if rng.random::<bool>() { "up" } else { "down" },
        },
        ConfidenceFactor {
            name: "Twitter whining index",
            value: rng.random_range(0..100),
            trend: if rng.random::<f64>() > 0.4 { "up" } else { "down" },
        },
        ConfidenceFactor {
            // There is never a shortage of experts.
            name: "Number of 'experts'",
            value: rng.random_range(60..100),
            trend: "up",
        },
        ConfidenceFactor {
            name: "Financial panic index",
            value: rng.random_range(0..100),
            trend: if sentiment == MarketSentiment::Positive {
                "down"
            } else {
                "up"
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_always_opposes_the_crowd() {
        let euphoric = contrarian_recommendation(MarketSentiment::Positive, 90);
        assert!(euphoric.contains("sell"));

        let panicking = contrarian_recommendation(MarketSentiment::Negative, 10);
        assert!(panicking.contains("buy"));
    }

    #[test]
    fn expert_count_always_trends_up() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let factors = confidence_factors(&mut rng, MarketSentiment::Negative);
            let experts = factors
                .iter()
                .find(|f| f.name.contains("experts"))
                .expect("expert factor present");
            assert_eq!(experts.trend, "up");
            assert!(experts.value >= 60);
        }
    }

    #[test]
    fn panic_index_trend_mirrors_sentiment() {
        let mut rng = rand::rng();
        let positive = confidence_factors(&mut rng, MarketSentiment::Positive);
        assert_eq!(
            positive.iter().find(|f| f.name.contains("panic")).unwrap().trend,
            "down"
        );
        let negative = confidence_factors(&mut rng, MarketSentiment::Negative);
        assert_eq!(
            negative.iter().find(|f| f.name.contains("panic")).unwrap().trend,
            "up"
        );
    }
}
