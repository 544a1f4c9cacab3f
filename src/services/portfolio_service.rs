use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::external::market_data::MarketDataProvider;
use crate::models::{Holding, PortfolioValuation, Quote};
use crate::services::valuation_service::valuate;
use crate::store::holdings::distinct_symbols;
use crate::store::HoldingsStore;

struct Published {
    cycle: u64,
    valuation: PortfolioValuation,
}

struct Shared {
    store: HoldingsStore,
    provider: Arc<dyn MarketDataProvider>,
    published: RwLock<Option<Published>>,
    next_cycle: AtomicU64,
}

/// Owns the refresh cycle that prices the holdings store.
///
/// Each call to [`PortfolioService::refresh`] starts a cycle: quotes for every
/// distinct symbol are fetched concurrently and, once all have settled, joined
/// by symbol against whatever the store holds at that moment. A cycle never
/// publishes over a newer cycle's result.
#[derive(Clone)]
pub struct PortfolioService {
    shared: Arc<Shared>,
}

/// Handle on an in-flight refresh cycle.
///
/// Dropping the handle detaches the cycle unless it was marked with
/// [`RefreshHandle::cancel_on_drop`].
pub struct RefreshHandle {
    cycle: u64,
    handle: JoinHandle<PortfolioValuation>,
    cancel_on_drop: bool,
}

impl RefreshHandle {
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Abort the cycle. Nothing is published for an aborted cycle.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn cancel_on_drop(mut self) -> Self {
        self.cancel_on_drop = true;
        self
    }

    pub async fn join(mut self) -> Result<PortfolioValuation, AppError> {
        let cycle = self.cycle;
        (&mut self.handle).await.map_err(|e| {
            if e.is_cancelled() {
                AppError::Cancelled
            } else {
                AppError::External(format!("refresh cycle {} failed: {}", cycle, e))
            }
        })
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if self.cancel_on_drop && !self.handle.is_finished() {
            debug!("Refresh cycle {} abandoned, cancelling", self.cycle);
            self.cancel();
        }
    }
}

impl PortfolioService {
    pub fn new(store: HoldingsStore, provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                provider,
                published: RwLock::new(None),
                next_cycle: AtomicU64::new(0),
            }),
        }
    }

    pub fn holdings(&self) -> Vec<Holding> {
        self.shared.store.list()
    }

    pub fn add_holding(&self, holding: Holding) -> u64 {
        info!(
            "Adding lot {} x {} @ {}",
            holding.symbol, holding.quantity, holding.cost_basis
        );
        self.shared.store.add(holding)
    }

    pub fn remove_holding(&self, symbol: &str) -> usize {
        let removed = self.shared.store.remove(symbol);
        info!("Removed {} lot(s) for {}", removed, symbol);
        removed
    }

    /// Start a refresh cycle. Must be called inside a tokio runtime.
    pub fn refresh(&self) -> RefreshHandle {
        let cycle = self.shared.next_cycle.fetch_add(1, Ordering::SeqCst) + 1;
        let shared = self.shared.clone();
        let handle = tokio::spawn(async move { run_cycle(shared, cycle).await });
        RefreshHandle {
            cycle,
            handle,
            cancel_on_drop: false,
        }
    }

    /// Refresh and wait for the result. The cycle is cancelled if the caller
    /// stops waiting.
    pub async fn value_now(&self) -> Result<PortfolioValuation, AppError> {
        self.refresh().cancel_on_drop().join().await
    }

    /// Last published valuation, if any cycle has completed
    pub fn latest(&self) -> Option<PortfolioValuation> {
        self.shared
            .published
            .read()
            .as_ref()
            .map(|p| p.valuation.clone())
    }
}

async fn run_cycle(shared: Arc<Shared>, cycle: u64) -> PortfolioValuation {
    let (revision, holdings) = shared.store.snapshot();
    let symbols = distinct_symbols(&holdings);
    info!(
        "Refresh cycle {} started: {} lot(s), {} symbol(s), revision {}",
        cycle,
        holdings.len(),
        symbols.len(),
        revision
    );

    let quotes = fetch_quotes(shared.provider.as_ref(), &symbols).await;

    // Join against the holdings as they are now, not as they were at fan-out
    let (current_revision, current) = shared.store.snapshot();
    let stale = current_revision != revision;
    if stale {
        warn!(
            "Refresh cycle {}: holdings changed in flight (revision {} -> {}), joining quotes by symbol",
            cycle, revision, current_revision
        );
    }

    let (rows, summary) = valuate(&current, &quotes);
    let valuation = PortfolioValuation {
        holdings: rows,
        summary,
        revision: current_revision,
        stale,
        valued_at: Utc::now(),
    };

    publish(&shared, cycle, &valuation);
    valuation
}

fn publish(shared: &Shared, cycle: u64, valuation: &PortfolioValuation) {
    let mut published = shared.published.write();
    match published.as_ref() {
        Some(p) if p.cycle > cycle => {
            debug!(
                "Refresh cycle {} finished after cycle {}, not publishing",
                cycle, p.cycle
            );
        }
        _ => {
            info!(
                "Refresh cycle {} published: total value {:.2}, gain {:.2}",
                cycle, valuation.summary.total_value, valuation.summary.total_gain
            );
            *published = Some(Published {
                cycle,
                valuation: valuation.clone(),
            });
        }
    }
}

/// Fetch quotes for all symbols concurrently and wait for every request to
/// settle. Failed or unknown symbols are left out of the map.
pub async fn fetch_quotes(
    provider: &dyn MarketDataProvider,
    symbols: &[String],
) -> HashMap<String, Quote> {
    let futures: Vec<_> = symbols
        .iter()
        .map(|symbol| async move { (symbol, provider.get_quote(symbol).await) })
        .collect();

    let results = futures::future::join_all(futures).await;

    let mut quotes = HashMap::with_capacity(results.len());
    for (symbol, result) in results {
        match result {
            Ok(Some(quote)) => {
                quotes.insert(symbol.clone(), quote);
            }
            Ok(None) => warn!("No quote available for {}, using cost basis", symbol),
            Err(e) => warn!("Quote fetch failed for {}: {}. Using cost basis", symbol, e),
        }
    }
    quotes
}
