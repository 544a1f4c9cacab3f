use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::{normalize_symbol, Holding};

#[derive(Debug, Default)]
struct Inner {
    holdings: Vec<Holding>,
    revision: u64,
}

/// Ordered, in-memory collection of holdings for the session.
///
/// Clones share the same collection. Every successful mutation bumps the
/// revision so in-flight refresh cycles can tell the set has moved on.
#[derive(Debug, Clone, Default)]
pub struct HoldingsStore {
    inner: Arc<RwLock<Inner>>,
}

impl HoldingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with the demo lots
    pub fn seeded() -> Self {
        let store = Self::new();
        for holding in seed_holdings() {
            store.add(holding);
        }
        store
    }

    /// Append a lot. Same-symbol lots are not merged.
    pub fn add(&self, holding: Holding) -> u64 {
        let mut inner = self.inner.write();
        inner.holdings.push(holding);
        inner.revision += 1;
        inner.revision
    }

    /// Remove every lot for `symbol`. Returns how many lots were removed.
    pub fn remove(&self, symbol: &str) -> usize {
        let symbol = normalize_symbol(symbol);
        let mut inner = self.inner.write();
        let before = inner.holdings.len();
        inner.holdings.retain(|h| h.symbol != symbol);
        let removed = before - inner.holdings.len();
        if removed > 0 {
            inner.revision += 1;
        }
        removed
    }

    pub fn list(&self) -> Vec<Holding> {
        self.inner.read().holdings.clone()
    }

    /// Revision and holdings read under one lock
    pub fn snapshot(&self) -> (u64, Vec<Holding>) {
        let inner = self.inner.read();
        (inner.revision, inner.holdings.clone())
    }

    #[allow(dead_code)]
    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }

    /// Distinct symbols in first-seen order
    #[allow(dead_code)]
    pub fn symbols(&self) -> Vec<String> {
        distinct_symbols(&self.inner.read().holdings)
    }
}

pub fn distinct_symbols(holdings: &[Holding]) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for holding in holdings {
        if !symbols.contains(&holding.symbol) {
            symbols.push(holding.symbol.clone());
        }
    }
    symbols
}

fn seed_holdings() -> Vec<Holding> {
    vec![
        Holding::new("AAPL", 10.0, 150.00),
        Holding::new("TSLA", 5.0, 200.00),
        Holding::new("NVDA", 8.0, 400.00),
    ]
}
