use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub headline: String,
    pub summary: String,
    pub image: String,
    pub url: String,
    pub source: String,
    pub datetime: DateTime<Utc>,
}

/// Request parameters for fetching news
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsQueryParams {
    /// Number of articles to return (default: 10)
    pub limit: Option<usize>,
}
