use std::collections::HashMap;

use crate::models::{EnrichedHolding, Holding, PortfolioSummary, Quote};

/// Join holdings with current quotes and aggregate portfolio totals.
///
/// Rows come back in the same order as `holdings`. A holding whose symbol has
/// no quote, or whose quote price is not finite, is valued at its cost basis,
/// so its gain is exactly zero. Percentages whose denominator is zero are
/// reported as `0.0` rather than NaN or infinity. Inputs are not validated;
/// odd quantities or prices flow through the arithmetic as-is.
pub fn valuate(
    holdings: &[Holding],
    quotes: &HashMap<String, Quote>,
) -> (Vec<EnrichedHolding>, PortfolioSummary) {
    let enriched: Vec<EnrichedHolding> = holdings
        .iter()
        .map(|holding| enrich(holding, quotes.get(&holding.symbol)))
        .collect();

    let total_value: f64 = enriched.iter().map(|h| h.current_value).sum();
    let total_cost: f64 = holdings.iter().map(Holding::total_cost).sum();
    let total_gain = total_value - total_cost;

    let summary = PortfolioSummary {
        total_value,
        total_cost,
        total_gain,
        total_gain_percent: percent_of(total_gain, total_cost),
    };

    (enriched, summary)
}

fn enrich(holding: &Holding, quote: Option<&Quote>) -> EnrichedHolding {
    let current_price = quote
        .map(|q| q.current_price)
        .filter(|price| price.is_finite())
        .unwrap_or(holding.cost_basis);

    let cost = holding.total_cost();
    let current_value = holding.quantity * current_price;
    let gain = current_value - cost;

    EnrichedHolding {
        symbol: holding.symbol.clone(),
        quantity: holding.quantity,
        cost_basis: holding.cost_basis,
        current_price,
        current_value,
        gain,
        gain_percent: percent_of(gain, cost),
    }
}

fn percent_of(gain: f64, cost: f64) -> f64 {
    if cost == 0.0 {
        return 0.0;
    }
    let pct = gain / cost * 100.0;
    if pct.is_finite() { pct } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes(entries: &[(&str, f64)]) -> HashMap<String, Quote> {
        entries
            .iter()
            .map(|(symbol, price)| (symbol.to_string(), Quote::with_price(symbol, *price)))
            .collect()
    }

    #[test]
    fn test_two_lots_same_symbol() {
        let holdings = vec![
            Holding::new("AAPL", 10.0, 150.0),
            Holding::new("AAPL", 5.0, 160.0),
        ];
        let (rows, summary) = valuate(&holdings, &quotes(&[("AAPL", 172.0)]));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].current_value, 1720.0);
        assert_eq!(rows[0].gain, 220.0);
        assert_eq!(rows[1].current_value, 860.0);
        assert_eq!(rows[1].gain, 60.0);

        assert_eq!(summary.total_value, 2580.0);
        assert_eq!(summary.total_cost, 2300.0);
        assert_eq!(summary.total_gain, 280.0);
        assert!((summary.total_gain_percent - 12.1739).abs() < 0.001);
    }

    #[test]
    fn test_missing_quote_falls_back_to_cost_basis() {
        let holdings = vec![Holding::new("TSLA", 5.0, 200.0)];
        let (rows, summary) = valuate(&holdings, &HashMap::new());

        assert_eq!(rows[0].current_price, 200.0);
        assert_eq!(rows[0].current_value, 1000.0);
        assert_eq!(rows[0].gain, 0.0);
        assert_eq!(rows[0].gain_percent, 0.0);
        assert_eq!(summary.total_gain, 0.0);
    }

    #[test]
    fn test_non_finite_quote_falls_back_to_cost_basis() {
        let holdings = vec![
            Holding::new("NVDA", 8.0, 400.0),
            Holding::new("MSFT", 1.0, 300.0),
        ];
        let q = quotes(&[("NVDA", f64::NAN), ("MSFT", f64::INFINITY)]);
        let (rows, _) = valuate(&holdings, &q);

        assert_eq!(rows[0].current_price, 400.0);
        assert_eq!(rows[1].current_price, 300.0);
        assert!(rows.iter().all(|r| r.gain == 0.0));
    }

    #[test]
    fn test_empty_portfolio_is_all_zero() {
        let (rows, summary) = valuate(&[], &quotes(&[("AAPL", 172.0)]));
        assert!(rows.is_empty());
        assert_eq!(summary, PortfolioSummary::default());
        assert!(!summary.total_gain_percent.is_nan());
    }

    #[test]
    fn test_zero_cost_does_not_produce_nan() {
        let holdings = vec![Holding::new("FREE", 0.0, 10.0)];
        let (rows, summary) = valuate(&holdings, &quotes(&[("FREE", 12.0)]));
        assert_eq!(rows[0].gain_percent, 0.0);
        assert_eq!(summary.total_gain_percent, 0.0);
    }

    #[test]
    fn test_order_matches_input() {
        let holdings = vec![
            Holding::new("NVDA", 8.0, 400.0),
            Holding::new("AAPL", 10.0, 150.0),
            Holding::new("TSLA", 5.0, 200.0),
            Holding::new("AAPL", 1.0, 100.0),
        ];
        let (rows, _) = valuate(&holdings, &quotes(&[("AAPL", 172.48), ("NVDA", 467.65)]));

        let symbols: Vec<&str> = rows.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["NVDA", "AAPL", "TSLA", "AAPL"]);
    }

    #[test]
    fn test_totals_are_sums_of_rows() {
        let holdings = vec![
            Holding::new("AAPL", 10.0, 150.0),
            Holding::new("TSLA", 5.0, 200.0),
            Holding::new("NVDA", 8.0, 400.0),
        ];
        let q = quotes(&[("AAPL", 172.48), ("TSLA", 234.30), ("NVDA", 467.65)]);
        let (rows, summary) = valuate(&holdings, &q);

        let value: f64 = rows.iter().map(|r| r.current_value).sum();
        let cost: f64 = holdings.iter().map(|h| h.quantity * h.cost_basis).sum();
        assert_eq!(summary.total_value, value);
        assert_eq!(summary.total_cost, cost);
        assert_eq!(summary.total_gain, value - cost);
    }

    #[test]
    fn test_valuate_is_idempotent() {
        let holdings = vec![
            Holding::new("AAPL", 10.0, 150.0),
            Holding::new("GOOGL", 3.0, 145.0),
        ];
        let q = quotes(&[("AAPL", 172.48)]);
        assert_eq!(valuate(&holdings, &q), valuate(&holdings, &q));
    }
}
