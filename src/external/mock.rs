use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;

use crate::external::market_data::{MarketDataProvider, ProviderError};
use crate::models::{CompanyProfile, NewsArticle, Quote};

/// (symbol, price, change, change %)
const MOCK_QUOTES: [(&str, f64, f64, f64); 6] = [
    ("AAPL", 172.48, 2.54, 1.49),
    ("GOOGL", 140.21, -1.12, -0.79),
    ("MSFT", 370.95, 0.45, 0.12),
    ("AMZN", 138.12, -2.33, -1.66),
    ("TSLA", 234.30, 5.60, 2.45),
    ("NVDA", 467.65, -8.11, -1.70),
];

/// (symbol, name, industry, market cap in millions)
const MOCK_PROFILES: [(&str, &str, &str, f64); 6] = [
    ("AAPL", "Apple Inc", "Technology", 2_680_000.0),
    ("GOOGL", "Alphabet Inc", "Media", 1_760_000.0),
    ("MSFT", "Microsoft Corp", "Technology", 2_750_000.0),
    ("AMZN", "Amazon.com Inc", "Retail", 1_430_000.0),
    ("TSLA", "Tesla Inc", "Automobiles", 745_000.0),
    ("NVDA", "NVIDIA Corp", "Semiconductors", 1_150_000.0),
];

/// Offline market data used when no API key is configured
#[derive(Debug, Default, Clone)]
pub struct MockMarketData;

impl MockMarketData {
    pub fn new() -> Self {
        Self
    }

    pub fn symbols() -> Vec<String> {
        MOCK_QUOTES.iter().map(|(s, ..)| s.to_string()).collect()
    }
}

fn mock_news() -> Vec<NewsArticle> {
    let now = Utc::now();
    vec![
        NewsArticle {
            id: "1".to_string(),
            headline: "Tech Stocks Rally as Inflation Fears Subside".to_string(),
            summary: "Major technology stocks saw significant gains today after the latest CPI report indicated a cooling of inflation, boosting investor confidence.".to_string(),
            image: "https://picsum.photos/seed/news1/400/200".to_string(),
            url: "#".to_string(),
            source: "MarketWatch".to_string(),
            datetime: now - Duration::hours(1),
        },
        NewsArticle {
            id: "2".to_string(),
            headline: "Federal Reserve Holds Interest Rates Steady, Cites Economic Resilience".to_string(),
            summary: "The Federal Reserve concluded its two-day meeting by announcing it will maintain the current federal funds rate, signaling a cautious but optimistic outlook.".to_string(),
            image: "https://picsum.photos/seed/news2/400/200".to_string(),
            url: "#".to_string(),
            source: "Reuters".to_string(),
            datetime: now - Duration::hours(2),
        },
        NewsArticle {
            id: "3".to_string(),
            headline: "The Rise of AI in Portfolio Management: What Investors Need to Know".to_string(),
            summary: "Artificial intelligence is revolutionizing how portfolios are managed, offering new tools for risk assessment and opportunity identification.".to_string(),
            image: "https://picsum.photos/seed/news3/400/200".to_string(),
            url: "#".to_string(),
            source: "Bloomberg".to_string(),
            datetime: now - Duration::hours(3),
        },
    ]
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError> {
        let quote = MOCK_QUOTES
            .iter()
            .find(|(s, ..)| *s == symbol)
            .map(|(s, price, change, change_percent)| Quote {
                symbol: s.to_string(),
                current_price: *price,
                change: Some(*change),
                change_percent: Some(*change_percent),
                open: None,
                high: None,
                low: None,
                previous_close: Some(price - change),
            });
        Ok(quote)
    }

    async fn get_company_profile(
        &self,
        symbol: &str,
    ) -> Result<Option<CompanyProfile>, ProviderError> {
        let profile = MOCK_PROFILES
            .iter()
            .find(|(s, ..)| *s == symbol)
            .map(|(s, name, industry, market_cap)| CompanyProfile {
                symbol: s.to_string(),
                name: Some(name.to_string()),
                country: Some("US".to_string()),
                currency: Some("USD".to_string()),
                exchange: Some("NASDAQ".to_string()),
                industry: Some(industry.to_string()),
                market_capitalization: Some(*market_cap),
                ..CompanyProfile::default()
            });
        Ok(profile)
    }

    async fn get_company_news(
        &self,
        symbol: &str,
        _days: i64,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        if MOCK_QUOTES.iter().any(|(s, ..)| *s == symbol) {
            Ok(mock_news())
        } else {
            Ok(Vec::new())
        }
    }

    async fn get_market_news(&self, limit: usize) -> Result<Vec<NewsArticle>, ProviderError> {
        Ok(mock_news().into_iter().take(limit).collect())
    }

    async fn get_sparkline(&self, _symbol: &str, points: usize) -> Result<Vec<f64>, ProviderError> {
        let mut rng = rand::rng();
        Ok((0..points).map(|_| rng.random_range(0.0..100.0)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_known_symbol_has_quote() {
        let provider = MockMarketData::new();
        let quote = provider.get_quote("AAPL").await.unwrap().unwrap();
        assert_eq!(quote.current_price, 172.48);
        assert_eq!(quote.change, Some(2.54));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_absent_not_zero() {
        let provider = MockMarketData::new();
        assert!(provider.get_quote("ZZZZ").await.unwrap().is_none());
        assert!(provider.get_company_profile("ZZZZ").await.unwrap().is_none());
        assert!(provider.get_company_news("ZZZZ", 7).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sparkline_bounds() {
        let provider = MockMarketData::new();
        let points = provider.get_sparkline("TSLA", 20).await.unwrap();
        assert_eq!(points.len(), 20);
        assert!(points.iter().all(|p| (0.0..100.0).contains(p)));
    }

    #[tokio::test]
    async fn test_market_news_limit() {
        let provider = MockMarketData::new();
        assert_eq!(provider.get_market_news(2).await.unwrap().len(), 2);
        assert_eq!(provider.get_market_news(10).await.unwrap().len(), 3);
    }
}
