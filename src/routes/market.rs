use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{NewsArticle, NewsQueryParams, StockDetail, StockQuote};
use crate::services::market_service;
use crate::state::AppState;

const DEFAULT_NEWS_LIMIT: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct DiscoverParams {
    pub q: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/watchlist", get(get_watchlist))
        .route("/discover", get(get_discover))
        .route("/news", get(get_news))
}

pub fn stocks_router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(get_stock_detail))
}

pub async fn get_watchlist(
    State(state): State<AppState>,
) -> Json<Vec<StockQuote>> {
    info!("GET /market/watchlist - {} symbols", state.watchlist_symbols.len());
    let rows = market_service::watchlist(state.market_data.as_ref(), &state.watchlist_symbols).await;
    Json(rows)
}

pub async fn get_discover(
    State(state): State<AppState>,
    Query(params): Query<DiscoverParams>,
) -> Json<Vec<StockQuote>> {
    info!("GET /market/discover - query {:?}", params.q);
    let rows = market_service::discover(
        state.market_data.as_ref(),
        &state.popular_symbols,
        params.q.as_deref(),
    ).await;
    Json(rows)
}

pub async fn get_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQueryParams>,
) -> Result<Json<Vec<NewsArticle>>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_NEWS_LIMIT).clamp(1, 50);
    info!("GET /market/news - limit {}", limit);
    let news = market_service::market_news(state.market_data.as_ref(), limit).await
        .map_err(|e| {
            error!("Failed to fetch market news: {}", e);
            e
        })?;
    Ok(Json(news))
}

pub async fn get_stock_detail(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<StockDetail>, AppError> {
    info!("GET /stocks/{} - Loading stock detail", symbol);
    let detail = market_service::stock_detail(state.market_data.as_ref(), &state.community, &symbol).await
        .map_err(|e| {
            error!("Failed to load data for {}: {}", symbol, e);
            e
        })?;
    Ok(Json(detail))
}
