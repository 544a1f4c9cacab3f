use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::external::market_data::{MarketDataProvider, ProviderError};
use crate::models::{CompanyProfile, NewsArticle, Quote};
use crate::services::rate_limiter::RateLimiter;

const BASE_URL: &str = "https://finnhub.io/api/v1";
const MAX_COMPANY_NEWS: usize = 10;

/// Response from /quote
#[derive(Debug, Deserialize)]
struct FinnhubQuote {
    /// Current price
    c: Option<f64>,
    /// Change
    d: Option<f64>,
    /// Percent change
    dp: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    o: Option<f64>,
    /// Previous close
    pc: Option<f64>,
}

/// Response from /stock/profile2. Unknown symbols return `{}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinnhubProfile {
    ticker: Option<String>,
    name: Option<String>,
    country: Option<String>,
    currency: Option<String>,
    exchange: Option<String>,
    ipo: Option<String>,
    market_capitalization: Option<f64>,
    share_outstanding: Option<f64>,
    logo: Option<String>,
    phone: Option<String>,
    weburl: Option<String>,
    finnhub_industry: Option<String>,
}

/// Item of /news and /company-news
#[derive(Debug, Deserialize)]
struct FinnhubNewsItem {
    id: Option<i64>,
    headline: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    image: String,
    url: String,
    #[serde(default)]
    source: String,
    /// Unix seconds
    datetime: i64,
}

/// Response from /stock/candle
#[derive(Debug, Deserialize)]
struct FinnhubCandles {
    s: String,
    #[serde(default)]
    c: Vec<f64>,
}

pub struct FinnhubProvider {
    client: Client,
    api_key: String,
    limiter: RateLimiter,
}

impl FinnhubProvider {
    pub fn new(api_key: String, requests_per_minute: u32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            limiter: RateLimiter::new(5, requests_per_minute),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let _guard = self.limiter.acquire().await?;
        let url = format!("{}{}", BASE_URL, endpoint);
        debug!("Finnhub GET {} {:?}", endpoint, params);

        let resp = self
            .client
            .get(&url)
            .header("X-Finnhub-Token", &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            check_status(status, &body)?;
            unreachable!("check_status rejects non-success statuses");
        }

        resp.json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for FinnhubProvider {
    fn name(&self) -> &'static str {
        "finnhub"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>, ProviderError> {
        let raw: FinnhubQuote = self
            .fetch("/quote", &[("symbol", symbol.to_string())])
            .await?;
        Ok(map_quote(symbol, raw))
    }

    async fn get_company_profile(
        &self,
        symbol: &str,
    ) -> Result<Option<CompanyProfile>, ProviderError> {
        let raw: FinnhubProfile = self
            .fetch("/stock/profile2", &[("symbol", symbol.to_string())])
            .await?;
        Ok(map_profile(symbol, raw))
    }

    async fn get_company_news(
        &self,
        symbol: &str,
        days: i64,
    ) -> Result<Vec<NewsArticle>, ProviderError> {
        let to = Utc::now().date_naive();
        let from = to - chrono::Duration::days(days.max(1));
        let items: Vec<FinnhubNewsItem> = self
            .fetch(
                "/company-news",
                &[
                    ("symbol", symbol.to_string()),
                    ("from", from.format("%Y-%m-%d").to_string()),
                    ("to", to.format("%Y-%m-%d").to_string()),
                ],
            )
            .await?;

        let articles = map_news(items, MAX_COMPANY_NEWS);
        info!("Fetched {} company news articles for {}", articles.len(), symbol);
        Ok(articles)
    }

    async fn get_market_news(&self, limit: usize) -> Result<Vec<NewsArticle>, ProviderError> {
        let items: Vec<FinnhubNewsItem> = self
            .fetch("/news", &[("category", "general".to_string())])
            .await?;
        Ok(map_news(items, limit))
    }

    async fn get_sparkline(&self, symbol: &str, points: usize) -> Result<Vec<f64>, ProviderError> {
        let to = Utc::now().timestamp();
        let from = to - 7 * 24 * 3600;
        let candles: FinnhubCandles = self
            .fetch(
                "/stock/candle",
                &[
                    ("symbol", symbol.to_string()),
                    ("resolution", "60".to_string()),
                    ("from", from.to_string()),
                    ("to", to.to_string()),
                ],
            )
            .await?;
        Ok(map_candles(candles, points))
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), ProviderError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }
    if !status.is_success() {
        return Err(ProviderError::BadResponse(format!("HTTP {}: {}", status, body)));
    }
    Ok(())
}

fn map_quote(symbol: &str, raw: FinnhubQuote) -> Option<Quote> {
    let current_price = raw.c?;
    // Finnhub answers unknown symbols with an all-zero quote
    if current_price == 0.0 && raw.o.unwrap_or(0.0) == 0.0 && raw.pc.unwrap_or(0.0) == 0.0 {
        return None;
    }

    Some(Quote {
        symbol: symbol.to_string(),
        current_price,
        change: raw.d,
        change_percent: raw.dp,
        open: raw.o,
        high: raw.h,
        low: raw.l,
        previous_close: raw.pc,
    })
}

fn map_profile(symbol: &str, raw: FinnhubProfile) -> Option<CompanyProfile> {
    if raw.name.is_none() && raw.ticker.is_none() {
        return None;
    }

    Some(CompanyProfile {
        symbol: raw.ticker.unwrap_or_else(|| symbol.to_string()),
        name: raw.name,
        country: raw.country,
        currency: raw.currency,
        exchange: raw.exchange,
        ipo: raw.ipo,
        market_capitalization: raw.market_capitalization,
        share_outstanding: raw.share_outstanding,
        logo: raw.logo,
        phone: raw.phone,
        weburl: raw.weburl,
        industry: raw.finnhub_industry,
    })
}

fn map_news(items: Vec<FinnhubNewsItem>, limit: usize) -> Vec<NewsArticle> {
    items
        .into_iter()
        .take(limit)
        .map(|item| NewsArticle {
            id: item.id.map(|id| id.to_string()).unwrap_or_else(|| item.url.clone()),
            headline: item.headline,
            summary: item.summary,
            image: item.image,
            url: item.url,
            source: item.source,
            datetime: Utc.timestamp_opt(item.datetime, 0).single().unwrap_or_else(Utc::now),
        })
        .collect()
}

fn map_candles(candles: FinnhubCandles, points: usize) -> Vec<f64> {
    if candles.s != "ok" {
        return Vec::new();
    }
    let skip = candles.c.len().saturating_sub(points);
    candles.c.into_iter().skip(skip).collect()
}
