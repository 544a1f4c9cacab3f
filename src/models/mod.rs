mod holding;
mod quote;
mod valuation;
mod news;
mod community;
mod assistant;

pub use holding::{Holding, NewHolding, normalize_symbol};
pub use quote::{Quote, StockQuote, CompanyProfile, StockDetail};
pub use valuation::{EnrichedHolding, PortfolioSummary, PortfolioValuation};
pub use news::{NewsArticle, NewsQueryParams};
pub use community::{Author, CommunityPost, CreatePost};
pub use assistant::{AssistantQuery, AssistantAnswer};
