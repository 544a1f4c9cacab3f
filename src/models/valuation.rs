use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A holding joined with its current price. Derived on every valuation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedHolding {
    pub symbol: String,
    pub quantity: f64,
    pub cost_basis: f64,
    pub current_price: f64,
    pub current_value: f64,
    pub gain: f64,
    pub gain_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_gain: f64,
    pub total_gain_percent: f64,
}

/// Output of one refresh cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub holdings: Vec<EnrichedHolding>,
    pub summary: PortfolioSummary,
    /// Holdings revision the valuation was computed against
    pub revision: u64,
    /// Holdings changed while quotes were in flight
    pub stale: bool,
    pub valued_at: DateTime<Utc>,
}
