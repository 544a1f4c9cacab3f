use crate::external::mock::MockMarketData;
use crate::models::normalize_symbol;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_FINNHUB_RPM: u32 = 60;
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_POPULAR: &str = "AAPL,GOOGL,MSFT,AMZN,TSLA,NVDA,META,NFLX,AMD,INTC,JPM,V,DIS,BA,KO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Mock,
    Finnhub,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub provider: ProviderKind,
    pub finnhub_api_key: Option<String>,
    pub finnhub_requests_per_minute: u32,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub watchlist_symbols: Vec<String>,
    pub popular_symbols: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let finnhub_api_key = non_empty("FINNHUB_API_KEY");

        let provider = match non_empty("MARKET_DATA_PROVIDER") {
            Some(name) => match name.to_lowercase().as_str() {
                "mock" => ProviderKind::Mock,
                "finnhub" => ProviderKind::Finnhub,
                other => {
                    return Err(format!(
                        "Invalid MARKET_DATA_PROVIDER: {}. Must be 'mock' or 'finnhub'",
                        other
                    ))
                }
            },
            None if finnhub_api_key.is_some() => ProviderKind::Finnhub,
            None => ProviderKind::Mock,
        };

        if provider == ProviderKind::Finnhub && finnhub_api_key.is_none() {
            return Err("MARKET_DATA_PROVIDER is finnhub but FINNHUB_API_KEY is not set".to_string());
        }

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT '{}': {}", raw, e))?,
            None => DEFAULT_PORT,
        };

        let finnhub_requests_per_minute = match non_empty("FINNHUB_REQUESTS_PER_MINUTE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("Invalid FINNHUB_REQUESTS_PER_MINUTE '{}'", raw))?,
            None => DEFAULT_FINNHUB_RPM,
        };

        let watchlist_symbols = non_empty("WATCHLIST_SYMBOLS")
            .map(|raw| parse_symbols(&raw))
            .unwrap_or_else(MockMarketData::symbols);

        let popular_symbols = parse_symbols(
            &non_empty("POPULAR_SYMBOLS").unwrap_or_else(|| DEFAULT_POPULAR.to_string()),
        );

        Ok(Self {
            port,
            provider,
            finnhub_api_key,
            finnhub_requests_per_minute,
            gemini_api_key: non_empty("GEMINI_API_KEY"),
            gemini_model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            watchlist_symbols,
            popular_symbols,
        })
    }
}

/// Comma-separated list, normalized and deduplicated
pub fn parse_symbols(raw: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(normalize_symbol) {
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}
