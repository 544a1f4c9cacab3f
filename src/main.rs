mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::{AppConfig, ProviderKind};
use crate::external::finnhub::FinnhubProvider;
use crate::external::llm::{DisabledLlm, GeminiProvider, LlmConfig, LlmProvider};
use crate::external::market_data::MarketDataProvider;
use crate::external::mock::MockMarketData;
use crate::logging::LoggingConfig;
use crate::services::community_service::CommunityService;
use crate::services::portfolio_service::PortfolioService;
use crate::state::AppState;
use crate::store::HoldingsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;

    let config = AppConfig::from_env().map_err(anyhow::Error::msg)?;

    let market_data: Arc<dyn MarketDataProvider> = match config.provider {
        ProviderKind::Finnhub => {
            let api_key = config
                .finnhub_api_key
                .clone()
                .context("FINNHUB_API_KEY is required for the finnhub provider")?;
            tracing::info!(
                "📊 Using market data provider: Finnhub ({} req/min)",
                config.finnhub_requests_per_minute
            );
            Arc::new(FinnhubProvider::new(api_key, config.finnhub_requests_per_minute))
        }
        ProviderKind::Mock => {
            tracing::info!("📊 Using market data provider: offline demo data");
            Arc::new(MockMarketData::new())
        }
    };

    let llm: Arc<dyn LlmProvider> = match config.gemini_api_key.clone() {
        Some(api_key) => {
            let llm_config = LlmConfig {
                model: config.gemini_model.clone(),
                ..LlmConfig::default()
            };
            tracing::info!("🤖 AI assistant enabled (model: {})", llm_config.model);
            Arc::new(GeminiProvider::new(api_key, &llm_config))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set, AI assistant will return fallback answers");
            Arc::new(DisabledLlm)
        }
    };

    let state = AppState {
        portfolio: PortfolioService::new(HoldingsStore::seeded(), market_data.clone()),
        market_data,
        llm,
        community: CommunityService::seeded(),
        watchlist_symbols: Arc::new(config.watchlist_symbols.clone()),
        popular_symbols: Arc::new(config.popular_symbols.clone()),
    };

    // Warm the portfolio view so /api/portfolio/latest has data right away
    let warmup = state.portfolio.refresh();
    tracing::info!("Started initial portfolio refresh (cycle {})", warmup.cycle());

    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 StockPulse backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
