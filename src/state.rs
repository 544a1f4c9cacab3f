use std::sync::Arc;

use crate::external::llm::LlmProvider;
use crate::external::market_data::MarketDataProvider;
use crate::services::community_service::CommunityService;
use crate::services::portfolio_service::PortfolioService;

#[derive(Clone)]
pub struct AppState {
    pub market_data: Arc<dyn MarketDataProvider>,
    pub llm: Arc<dyn LlmProvider>,
    pub portfolio: PortfolioService,
    pub community: CommunityService,
    pub watchlist_symbols: Arc<Vec<String>>,
    pub popular_symbols: Arc<Vec<String>>,
}
