//! Prompt templates for each satirical feature.
//!
//! Every prompt pins the reply to a JSON object whose keys match the strict
//! decode shapes in [`crate::content`]; the stylistic constraints are the
//! product, the JSON contract is the engineering.

use sooth_core::PortfolioHolding;

/// System prompt for price predictions.
pub const FORECAST_SYSTEM: &str = "You are a sarcastic, toxic AI crypto soothsayer. Your job is \
     to produce deliberately absurd predictions that still sound technical.";

/// System prompt for portfolio roasts.
pub const ROAST_SYSTEM: &str = "You are a sarcastic, scathing AI financial analyst. Your job is \
     to produce deliberately harsh but funny reviews of investment decisions.";

/// System prompt for retroactive posts.
pub const RETRO_SYSTEM: &str = "You are a sarcastic AI that fabricates 'genius' market calls \
     from the past. Your job is to mock self-proclaimed market experts.";

/// System prompt for astrological factors.
pub const ASTRO_SYSTEM: &str = "You are a sarcastic crypto astrologer inventing pseudo-scientific \
     explanations for market moves.";

/// Prompt for a satirical prediction about one asset at its current price.
#[must_use]
pub fn forecast(asset_name: &str, asset_symbol: &str, price_usd: f64) -> String {
    format!(
        "Write a satirical, scathing prediction about the price and future of the \
         cryptocurrency {asset_name} ({symbol}). Current price: ${price_usd}.\n\
         \n\
         Requirements:\n\
         1. Use a maximally toxic, sarcastic tone.\n\
         2. Include absurd but pseudo-scientific justifications.\n\
         3. Pose as an overconfident 'expert'.\n\
         4. The more confident the prediction sounds, the more absurd it must be.\n\
         5. Use ridiculous correlations with unrelated phenomena.\n\
         6. Invent a few fake financial terms.\n\
         \n\
         Reply with a JSON object of this exact shape:\n\
         {{\"forecast\": \"the prediction, 1-2 paragraphs\", \
           \"confidence\": <number 0-100, higher for more absurd predictions>, \
           \"analysis\": \"a pseudo-scientific justification in 1-2 sentences\"}}",
        symbol = asset_symbol.to_uppercase(),
    )
}

/// Prompt for a roast of the submitted portfolio.
#[must_use]
pub fn portfolio_roast(holdings: &[PortfolioHolding]) -> String {
    let holdings_json =
        serde_json::to_string(holdings).unwrap_or_else(|_| "[]".to_owned());
    format!(
        "Review the following crypto portfolio in the most scathing, sarcastic tone \
         possible:\n{holdings_json}\n\
         \n\
         Requirements:\n\
         1. A merciless roast of the portfolio as a whole.\n\
         2. A personalized jab at every token.\n\
         3. Describe the 'alternate universe' where the user made the opposite choices.\n\
         4. Maximally toxic but humorous tone.\n\
         5. Work in a few metaphors of financial ruin.\n\
         \n\
         Reply with a JSON object of this exact shape:\n\
         {{\"overall_roast\": \"overall review, 1-2 paragraphs\", \
           \"token_roasts\": [{{\"name\": \"token name\", \"roast\": \"personalized jab\"}}], \
           \"alternate_universe\": \"the universe where every choice was reversed\"}}"
    )
}

/// Prompt for a fake post "published" on `posted_on`, before the asset
/// peaked at `peak_price`.
#[must_use]
pub fn retro_post(asset_name: &str, posted_on: &str, peak_price: f64) -> String {
    format!(
        "Write a fake post 'from the past' (dated {posted_on}) that supposedly predicted \
         the rise of {asset_name} from a much lower price to its peak of ${peak_price}.\n\
         \n\
         Requirements:\n\
         1. Use a smug, boastful tone.\n\
         2. Mention 'secret signals' that allegedly pointed at the rally.\n\
         3. Include several made-up technical indicators with pseudo-scientific names.\n\
         4. Pretend the move was 'obvious' to professionals.\n\
         5. Invent a few fake financial terms.\n\
         \n\
         Reply with a JSON object of this exact shape:\n\
         {{\"title\": \"post title\", \
           \"body\": \"post body, 1-2 paragraphs\", \
           \"indicators\": [\"3-5 'technical indicators' that were allegedly used\"], \
           \"signature\": \"signature of the fictional 'expert'\", \
           \"follow_up\": \"a short sarcastic note from our system\"}}"
    )
}

/// Prompt for three celestial factors allegedly moving `asset_id`.
#[must_use]
pub fn astro_factors(asset_id: &str) -> String {
    format!(
        "Invent three absurd but scientific-sounding 'astrological factors' that \
         allegedly influence the price of the cryptocurrency {asset_id}. Each factor \
         needs a pseudo-scientific name referencing a planet or star, a 'scientific' \
         explanation, and an influence rating.\n\
         \n\
         Reply with a JSON object of this exact shape:\n\
         {{\"factors\": [{{\"name\": \"factor name with a planet or star\", \
           \"description\": \"pseudo-scientific explanation of the price influence\", \
           \"impact\": \"strongly positive|positive|neutral|negative|strongly negative\", \
           \"probability\": <number 50-95>}}]}}"
    )
}
