use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{AssistantAnswer, AssistantQuery};
use crate::services::assistant_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask))
        .route("/examples", get(examples))
}

/// POST /api/assistant/ask
///
/// Request body: `{ "query": "Why is $TSLA volatile recently?" }`
///
/// Returns an AssistantAnswer. LLM outages come back as a degraded answer,
/// not as an error status.
async fn ask(
    State(state): State<AppState>,
    Json(query): Json<AssistantQuery>,
) -> Result<Json<AssistantAnswer>, AppError> {
    info!("POST /api/assistant/ask - Query: {}", query.query);

    let answer = assistant_service::ask(state.llm.as_ref(), query)
        .await
        .map_err(|e| {
            error!("Failed to answer query: {}", e);
            e
        })?;

    Ok(Json(answer))
}

async fn examples() -> Json<Vec<&'static str>> {
    Json(assistant_service::EXAMPLE_QUERIES.to_vec())
}
