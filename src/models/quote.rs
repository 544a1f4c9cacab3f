use serde::{Deserialize, Serialize};

use super::{CommunityPost, NewsArticle};

/// Point-in-time price observation for a symbol. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub current_price: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub previous_close: Option<f64>,
}

impl Quote {
    /// A quote carrying only a current price
    #[allow(dead_code)]
    pub fn with_price(symbol: &str, current_price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            current_price,
            change: None,
            change_percent: None,
            open: None,
            high: None,
            low: None,
            previous_close: None,
        }
    }
}

/// Watchlist / discover row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockQuote {
    #[serde(flatten)]
    pub quote: Quote,
    pub sparkline: Vec<f64>,
    /// Drives the green/red styling of the row
    #[serde(default)]
    pub is_gain: bool,
}

impl StockQuote {
    pub fn new(quote: Quote, sparkline: Vec<f64>) -> Self {
        let is_gain = match (sparkline.first(), sparkline.last()) {
            (Some(first), Some(last)) => last >= first,
            _ => quote.change.unwrap_or(0.0) >= 0.0,
        };
        Self { quote, sparkline, is_gain }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: String,
    pub name: Option<String>,
    pub country: Option<String>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub ipo: Option<String>,
    pub market_capitalization: Option<f64>,
    pub share_outstanding: Option<f64>,
    pub logo: Option<String>,
    pub phone: Option<String>,
    pub weburl: Option<String>,
    pub industry: Option<String>,
}

/// Everything the stock detail view needs for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDetail {
    pub profile: CompanyProfile,
    pub quote: Quote,
    pub news: Vec<NewsArticle>,
    pub posts: Vec<CommunityPost>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gain_uses_sparkline_endpoints() {
        let row = StockQuote::new(Quote::with_price("AAPL", 172.48), vec![10.0, 50.0, 12.0]);
        assert!(row.is_gain);

        let row = StockQuote::new(Quote::with_price("AAPL", 172.48), vec![10.0, 50.0, 9.0]);
        assert!(!row.is_gain);
    }

    #[test]
    fn test_is_gain_falls_back_to_change() {
        let mut quote = Quote::with_price("GOOGL", 140.21);
        quote.change = Some(-1.12);
        let row = StockQuote::new(quote, vec![]);
        assert!(!row.is_gain);
    }

    #[test]
    fn test_stock_quote_serializes_flat() {
        let row = StockQuote::new(Quote::with_price("MSFT", 370.95), vec![1.0, 0.5]);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["symbol"], "MSFT");
        assert_eq!(json["current_price"], 370.95);
        assert_eq!(json["sparkline"][0], 1.0);
        assert_eq!(json["is_gain"], false);
    }
}
