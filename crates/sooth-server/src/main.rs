mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, RuntimeSettings};
use crate::middleware::RateLimitState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = sooth_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.generation_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; every generation call will serve stub content");
    }

    let pool_config = sooth_db::PoolConfig::from_app_config(&config);
    let pool = sooth_db::connect_pool(&config.database_url, pool_config).await?;
    sooth_db::run_migrations(&pool).await?;

    let market = Arc::new(sooth_market::MarketClient::with_base_url(
        config.market_timeout_secs,
        &config.market_base_url,
    )?);
    let sentiment = Arc::new(sooth_market::FearGreedClient::with_base_url(
        config.market_timeout_secs,
        &config.sentiment_base_url,
    )?);
    let oracle = Arc::new(sooth_oracle::OracleClient::with_base_url(
        config.generation_api_key.clone(),
        &config.generation_model,
        config.generation_timeout_secs,
        &config.generation_base_url,
    )?);

    let state = AppState {
        pool,
        market,
        sentiment,
        oracle,
        cache: Arc::new(sooth_oracle::MemoryCache::new()),
        settings: RuntimeSettings {
            data_policy: config.data_policy,
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            expose_errors: config.env == sooth_core::Environment::Development,
        },
    };
    let rate_limit = RateLimitState::new(config.rate_limit_per_minute, Duration::from_secs(60));
    let app = build_app(state, rate_limit);

    tracing::info!(
        addr = %config.bind_addr,
        env = %config.env,
        "soothsayer online, ready to predict the future with coin-flip accuracy"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
