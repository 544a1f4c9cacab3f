use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub market_data: &'static str,
    pub llm_model: String,
    pub holdings: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    info!("GET /health - Health check");
    Json(HealthStatus {
        status: "OK",
        market_data: state.market_data.name(),
        llm_model: state.llm.model().to_string(),
        holdings: state.portfolio.holdings().len(),
    })
}
