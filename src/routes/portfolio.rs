use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{normalize_symbol, Holding, NewHolding, PortfolioValuation};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RemovedHoldings {
    pub symbol: String,
    pub removed: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_valuation))
        .route("/latest", get(get_latest_valuation))
        .route("/holdings", get(list_holdings).post(add_holding))
        .route("/holdings/:symbol", delete(remove_holding))
}

pub async fn get_valuation(
    State(state): State<AppState>,
) -> Result<Json<PortfolioValuation>, AppError> {
    info!("GET /portfolio - Refreshing portfolio valuation");
    let valuation = state.portfolio.value_now().await
        .map_err(|e| {
            error!("Failed to value portfolio: {}", e);
            e
        })?;
    Ok(Json(valuation))
}

pub async fn get_latest_valuation(
    State(state): State<AppState>,
) -> Result<Json<PortfolioValuation>, AppError> {
    info!("GET /portfolio/latest - Fetching last published valuation");
    state.portfolio.latest()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No valuation has been published yet".to_string()))
}

pub async fn list_holdings(
    State(state): State<AppState>,
) -> Json<Vec<Holding>> {
    info!("GET /portfolio/holdings - Listing holdings");
    Json(state.portfolio.holdings())
}

pub async fn add_holding(
    State(state): State<AppState>,
    Json(data): Json<NewHolding>,
) -> Result<(StatusCode, Json<Holding>), AppError> {
    info!("POST /portfolio/holdings - Adding {}", data.symbol);
    data.validate().map_err(|msg| {
        error!("Rejected holding: {}", msg);
        AppError::Validation(msg)
    })?;

    let holding = data.into_holding();
    state.portfolio.add_holding(holding.clone());
    Ok((StatusCode::CREATED, Json(holding)))
}

pub async fn remove_holding(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<RemovedHoldings>, AppError> {
    info!("DELETE /portfolio/holdings/{} - Removing all lots", symbol);
    match state.portfolio.remove_holding(&symbol) {
        0 => {
            error!("No holdings found for {}", symbol);
            Err(AppError::NotFound(format!("No holdings for {}", symbol)))
        }
        removed => Ok(Json(RemovedHoldings {
            symbol: normalize_symbol(&symbol),
            removed,
        })),
    }
}
