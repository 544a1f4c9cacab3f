use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::market_data::MarketDataProvider;
use crate::models::{normalize_symbol, NewsArticle, StockDetail, StockQuote};
use crate::services::community_service::CommunityService;

pub const SPARKLINE_POINTS: usize = 20;
const COMPANY_NEWS_DAYS: i64 = 7;

/// Quotes with sparklines for the watchlist, in watchlist order.
/// Symbols the provider cannot price are skipped.
pub async fn watchlist(
    provider: &dyn MarketDataProvider,
    symbols: &[String],
) -> Vec<StockQuote> {
    let futures: Vec<_> = symbols
        .iter()
        .map(|symbol| async move {
            let (quote, sparkline) = tokio::join!(
                provider.get_quote(symbol),
                provider.get_sparkline(symbol, SPARKLINE_POINTS)
            );
            (symbol, quote, sparkline)
        })
        .collect();

    let mut rows = Vec::with_capacity(symbols.len());
    for (symbol, quote, sparkline) in futures::future::join_all(futures).await {
        let quote = match quote {
            Ok(Some(quote)) => quote,
            Ok(None) => {
                warn!("Watchlist symbol {} has no quote, skipping", symbol);
                continue;
            }
            Err(e) => {
                warn!("Failed to fetch watchlist quote for {}: {}", symbol, e);
                continue;
            }
        };
        let sparkline = sparkline.unwrap_or_else(|e| {
            warn!("Failed to fetch sparkline for {}: {}", symbol, e);
            Vec::new()
        });
        rows.push(StockQuote::new(quote, sparkline));
    }

    info!("📋 Watchlist built with {} of {} symbols", rows.len(), symbols.len());
    rows
}

/// Quotes for the popular symbols, filtered by a case-insensitive substring
/// of the symbol. Failed lookups are dropped.
pub async fn discover(
    provider: &dyn MarketDataProvider,
    popular: &[String],
    query: Option<&str>,
) -> Vec<StockQuote> {
    let needle = query.map(|q| q.trim().to_lowercase()).unwrap_or_default();
    let candidates: Vec<&String> = popular
        .iter()
        .filter(|symbol| needle.is_empty() || symbol.to_lowercase().contains(&needle))
        .collect();

    let futures: Vec<_> = candidates
        .iter()
        .map(|symbol| async move { (*symbol, provider.get_quote(symbol).await) })
        .collect();

    futures::future::join_all(futures)
        .await
        .into_iter()
        .filter_map(|(symbol, result)| match result {
            Ok(Some(quote)) => Some(StockQuote::new(quote, Vec::new())),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to fetch quote for {}: {}", symbol, e);
                None
            }
        })
        .collect()
}

/// Profile, quote and company news fetched together. Any provider failure
/// fails the whole view.
pub async fn stock_detail(
    provider: &dyn MarketDataProvider,
    community: &CommunityService,
    symbol: &str,
) -> Result<StockDetail, AppError> {
    let symbol = normalize_symbol(symbol);
    if symbol.is_empty() {
        return Err(AppError::Validation("Symbol cannot be empty".into()));
    }

    let (profile, quote, news) = tokio::try_join!(
        provider.get_company_profile(&symbol),
        provider.get_quote(&symbol),
        provider.get_company_news(&symbol, COMPANY_NEWS_DAYS)
    )?;

    let profile = profile.ok_or_else(|| AppError::NotFound(format!("No profile for {}", symbol)))?;
    let quote = quote.ok_or_else(|| AppError::NotFound(format!("No quote for {}", symbol)))?;

    Ok(StockDetail {
        profile,
        quote,
        news,
        posts: community.posts(&symbol),
    })
}

pub async fn market_news(
    provider: &dyn MarketDataProvider,
    limit: usize,
) -> Result<Vec<NewsArticle>, AppError> {
    let news = provider.get_market_news(limit).await?;
    Ok(news)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::market_data::ProviderError;
    use crate::external::mock::MockMarketData;
    use crate::models::{CompanyProfile, Quote};
    use async_trait::async_trait;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Answers quotes but fails everything else
    struct QuoteOnlyProvider;

    #[async_trait]
    impl MarketDataProvider for QuoteOnlyProvider {
        fn name(&self) -> &'static str {
            "quote-only"
        }

        async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError> {
            if symbol == "DOWN" {
                return Err(ProviderError::Network("timeout".into()));
            }
            Ok(Some(Quote::with_price(symbol, 10.0)))
        }

        async fn get_company_profile(&self, _symbol: &str) -> Result<Option<CompanyProfile>, ProviderError> {
            Ok(Some(CompanyProfile::default()))
        }

        async fn get_company_news(&self, _symbol: &str, _days: i64) -> Result<Vec<NewsArticle>, ProviderError> {
            Err(ProviderError::RateLimited)
        }

        async fn get_market_news(&self, _limit: usize) -> Result<Vec<NewsArticle>, ProviderError> {
            Err(ProviderError::BadResponse("HTTP 500".into()))
        }

        async fn get_sparkline(&self, _symbol: &str, _points: usize) -> Result<Vec<f64>, ProviderError> {
            Err(ProviderError::BadResponse("premium endpoint".into()))
        }
    }

    #[tokio::test]
    async fn test_watchlist_skips_unknown_and_keeps_order() {
        let provider = MockMarketData::new();
        let rows = watchlist(&provider, &symbols(&["NVDA", "ZZZZ", "AAPL"])).await;

        let got: Vec<&str> = rows.iter().map(|r| r.quote.symbol.as_str()).collect();
        assert_eq!(got, vec!["NVDA", "AAPL"]);
        assert!(rows.iter().all(|r| r.sparkline.len() == SPARKLINE_POINTS));
    }

    #[tokio::test]
    async fn test_watchlist_survives_sparkline_failure() {
        let rows = watchlist(&QuoteOnlyProvider, &symbols(&["AAPL", "DOWN"])).await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].sparkline.is_empty());
    }

    #[tokio::test]
    async fn test_discover_filters_case_insensitively() {
        let provider = MockMarketData::new();
        let popular = MockMarketData::symbols();

        let all = discover(&provider, &popular, None).await;
        assert_eq!(all.len(), popular.len());

        let filtered = discover(&provider, &popular, Some("a")).await;
        let got: Vec<&str> = filtered.iter().map(|r| r.quote.symbol.as_str()).collect();
        assert_eq!(got, vec!["AAPL", "AMZN", "TSLA", "NVDA"]);

        assert!(discover(&provider, &popular, Some("xyz")).await.is_empty());
    }

    #[tokio::test]
    async fn test_discover_drops_failed_quotes() {
        let rows = discover(&QuoteOnlyProvider, &symbols(&["AAPL", "DOWN"]), Some("  ")).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quote.symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_stock_detail_joins_community_posts() {
        let provider = MockMarketData::new();
        let community = CommunityService::seeded();

        let detail = stock_detail(&provider, &community, "aapl").await.unwrap();
        assert_eq!(detail.quote.symbol, "AAPL");
        assert_eq!(detail.profile.name.as_deref(), Some("Apple Inc"));
        assert_eq!(detail.posts.len(), 2);
        assert!(!detail.news.is_empty());
    }

    #[tokio::test]
    async fn test_stock_detail_unknown_symbol_is_not_found() {
        let provider = MockMarketData::new();
        let result = stock_detail(&provider, &CommunityService::new(), "ZZZZ").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_stock_detail_fails_when_any_fetch_fails() {
        let result = stock_detail(&QuoteOnlyProvider, &CommunityService::new(), "AAPL").await;
        assert!(matches!(result, Err(AppError::RateLimited)));
    }

    #[tokio::test]
    async fn test_market_news_propagates_provider_error() {
        let result = market_news(&QuoteOnlyProvider, 5).await;
        assert!(matches!(result, Err(AppError::External(_))));
    }
}
