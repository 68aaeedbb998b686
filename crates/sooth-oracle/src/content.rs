//! Generated content shapes and their hardcoded stand-ins.
//!
//! Each shape decodes strictly from the generator's JSON reply: a missing or
//! mistyped field is a malformed reply, not a silently absent value. Every
//! shape has a stub constructor so the pipeline can always serve something
//! renderable, and `normalized()` clamps numeric fields into their
//! documented ranges.

use rand::Rng;
use serde::{Deserialize, Serialize};
use sooth_core::PortfolioHolding;

/// A satirical price prediction for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecast: String,
    pub confidence: i16,
    pub analysis: String,
}

impl Forecast {
    /// Confidence clamped into `[0, 100]`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.confidence = self.confidence.clamp(0, 100);
        self
    }

    /// The stand-in served when generation fails. Confidence lands in the
    /// 70–100 band the original expert community would claim.
    #[must_use]
    pub fn stub(asset_name: &str) -> Self {
        let confidence = rand::rng().random_range(70..=100);
        Self {
            forecast: format!(
                "{asset_name} will do what every cryptocurrency does best: make investors \
                 nervous and push them into bad decisions. Our proprietary Thumb In The Air \
                 indicator shows the price may go up, down, or in rare cases stay exactly \
                 where it is."
            ),
            confidence,
            analysis: "Based on the immutable laws of FOMO and panic selling, plus Mercury's \
                       current position in Taurus."
                .to_owned(),
        }
    }
}

/// One per-token jab inside a portfolio roast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRoast {
    pub name: String,
    pub roast: String,
}

/// A full portfolio roast: the overall verdict, one roast per token, and the
/// counterfactual universe where the user chose differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRoast {
    pub overall_roast: String,
    pub token_roasts: Vec<TokenRoast>,
    pub alternate_universe: String,
}

impl PortfolioRoast {
    /// Stand-in roast built from the submitted holdings, so even the stub
    /// addresses every token the user confessed to owning.
    #[must_use]
    pub fn stub(holdings: &[PortfolioHolding]) -> Self {
        let token_roasts = holdings
            .iter()
            .map(|h| {
                let price = h
                    .buy_price
                    .map_or_else(|| "????".to_owned(), |p| format!("{p}"));
                TokenRoast {
                    name: h.token.clone(),
                    roast: format!(
                        "Ah, {token}. A classic pick for people who prefer learning from their \
                         own mistakes. Buying at ${price} was especially inspired — a textbook \
                         case of buying the top and holding to zero.",
                        token = h.token,
                    ),
                }
            })
            .collect();

        Self {
            overall_roast: "Congratulations! Your portfolio is so unique that even our AI \
                            refused to analyze it. That is either genius or catastrophic — \
                            and it is probably the second one. The mix looks like you followed \
                            random Telegram tips while also buying everything trending on \
                            Twitter."
                .to_owned(),
            token_roasts,
            alternate_universe: "In an alternate universe you stuffed this money under a \
                                 mattress and only lost to inflation. Better yet, you bought an \
                                 index fund and are sipping a cocktail on a beach instead of \
                                 refreshing charts every five minutes hoping your favorite \
                                 shitcoin does a 10000%."
                .to_owned(),
        }
    }
}

/// A fake "called it" post written as if published months before the peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetroPost {
    pub title: String,
    pub body: String,
    pub indicators: Vec<String>,
    pub signature: String,
    pub follow_up: String,
}

impl RetroPost {
    #[must_use]
    pub fn stub(asset_name: &str) -> Self {
        Self {
            title: format!("{asset_name} — an obvious opportunity!"),
            body: format!(
                "Just finished a detailed analysis of {asset_name}, and as a professional I \
                 can say: this is an obvious opportunity. Every technical indicator points to \
                 colossal growth. Don't thank me later, just remember I said it first!"
            ),
            indicators: vec![
                "RSI divergence".to_owned(),
                "Double Fibonacci convergence".to_owned(),
                "Hamster volume crossover".to_owned(),
                "Lunar gravity index".to_owned(),
            ],
            signature: "CryptoMasterGuru9000, Certified Predictor of the Future™".to_owned(),
            follow_up: "Note: this post was written today. Predicting the past is not a \
                        superpower — it is standard practice among crypto analysts."
                .to_owned(),
        }
    }
}

/// Direction of an astrological factor's alleged market influence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Impact {
    #[serde(rename = "strongly positive")]
    StronglyPositive,
    #[serde(rename = "positive")]
    Positive,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "strongly negative")]
    StronglyNegative,
}

/// One pseudo-scientific celestial factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstroFactor {
    pub name: String,
    pub description: String,
    pub impact: Impact,
    pub probability: u8,
}

/// The factor list the generator is asked for, wrapped in an object so the
/// reply decodes deterministically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstroFactors {
    pub factors: Vec<AstroFactor>,
}

impl AstroFactors {
    /// Probabilities clamped into the advertised `[50, 95]` band.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for factor in &mut self.factors {
            factor.probability = factor.probability.clamp(50, 95);
        }
        self
    }

    #[must_use]
    pub fn stub() -> Self {
        Self {
            factors: vec![
                AstroFactor {
                    name: "Mercurial inversion".to_owned(),
                    description: "Retrograde Mercury induces electromagnetic wobble in the \
                                  blockchain."
                        .to_owned(),
                    impact: Impact::Negative,
                    probability: 73,
                },
                AstroFactor {
                    name: "Saturnine HODL index".to_owned(),
                    description: "Saturn in Taurus hardens the resolve of long-term holders."
                        .to_owned(),
                    impact: Impact::Positive,
                    probability: 68,
                },
                AstroFactor {
                    name: "Plutonic restructuring".to_owned(),
                    description: "Pluto is shifting its energy signature, which correlates with \
                                  on-chain activity."
                        .to_owned(),
                    impact: Impact::StronglyPositive,
                    probability: 81,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_decodes_strictly() {
        let ok: Forecast = serde_json::from_str(
            r#"{"forecast": "up", "confidence": 95, "analysis": "vibes"}"#,
        )
        .expect("complete shape should decode");
        assert_eq!(ok.confidence, 95);

        let missing = serde_json::from_str::<Forecast>(r#"{"forecast": "up"}"#);
        assert!(missing.is_err(), "missing fields must not decode");

        let mistyped =
            serde_json::from_str::<Forecast>(r#"{"forecast": "up", "confidence": "high", "analysis": ""}"#);
        assert!(mistyped.is_err(), "mistyped fields must not decode");
    }

    #[test]
    fn forecast_normalization_clamps_confidence() {
        let over = Forecast {
            forecast: String::new(),
            confidence: 9000,
            analysis: String::new(),
        };
        assert_eq!(over.normalized().confidence, 100);

        let under = Forecast {
            forecast: String::new(),
            confidence: -5,
            analysis: String::new(),
        };
        assert_eq!(under.normalized().confidence, 0);
    }

    #[test]
    fn forecast_stub_confidence_is_in_expert_band() {
        for _ in 0..50 {
            let stub = Forecast::stub("Bitcoin");
            assert!((70..=100).contains(&stub.confidence));
            assert!(stub.forecast.contains("Bitcoin"));
        }
    }

    #[test]
    fn portfolio_stub_roasts_every_holding() {
        let holdings = vec![
            PortfolioHolding {
                token: "DOGE".to_owned(),
                amount: Some(1000.0),
                buy_price: Some(0.45),
            },
            PortfolioHolding {
                token: "SHIB".to_owned(),
                amount: None,
                buy_price: None,
            },
        ];
        let stub = PortfolioRoast::stub(&holdings);
        assert_eq!(stub.token_roasts.len(), 2);
        assert!(stub.token_roasts[0].roast.contains("0.45"));
        assert!(stub.token_roasts[1].roast.contains("????"));
    }

    #[test]
    fn impact_round_trips_its_wire_spelling() {
        let json = serde_json::to_string(&Impact::StronglyPositive).expect("serialize");
        assert_eq!(json, "\"strongly positive\"");
        let back: Impact = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Impact::StronglyPositive);
    }

    #[test]
    fn astro_factors_normalization_clamps_probability() {
        let factors = AstroFactors {
            factors: vec![AstroFactor {
                name: "Test".to_owned(),
                description: String::new(),
                impact: Impact::Neutral,
                probability: 10,
            }],
        };
        assert_eq!(factors.normalized().factors[0].probability, 50);
    }

    #[test]
    fn every_stub_satisfies_its_own_schema() {
        // Stubs must decode through the same strict path as real replies, or
        // the fallback would violate the shape contract it exists to uphold.
        let forecast = serde_json::to_string(&Forecast::stub("Solana")).expect("serialize");
        assert!(serde_json::from_str::<Forecast>(&forecast).is_ok());

        let retro = serde_json::to_string(&RetroPost::stub("Solana")).expect("serialize");
        assert!(serde_json::from_str::<RetroPost>(&retro).is_ok());

        let astro = serde_json::to_string(&AstroFactors::stub()).expect("serialize");
        assert!(serde_json::from_str::<AstroFactors>(&astro).is_ok());
    }
}
