use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CompanyProfile, NewsArticle, Quote};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Source of quotes, company profiles and news.
///
/// Unknown symbols come back as `Ok(None)` rather than a zero price, so a
/// missing quote can never be mistaken for a legitimate price of zero.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError>;

    async fn get_company_profile(
        &self,
        symbol: &str,
    ) -> Result<Option<CompanyProfile>, ProviderError>;

    async fn get_company_news(
        &self,
        symbol: &str,
        days: i64,
    ) -> Result<Vec<NewsArticle>, ProviderError>;

    async fn get_market_news(&self, limit: usize) -> Result<Vec<NewsArticle>, ProviderError>;

    /// Recent closing prices, oldest first
    async fn get_sparkline(&self, symbol: &str, points: usize) -> Result<Vec<f64>, ProviderError>;
}
