pub mod valuation_service;
pub mod portfolio_service;
pub mod market_service;
pub mod community_service;
pub mod assistant_service;
pub mod rate_limiter;
