use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{CommunityPost, CreatePost};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:symbol", get(list_posts).post(create_post))
        .route("/:symbol/:id/like", post(like_post))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Json<Vec<CommunityPost>> {
    info!("GET /community/{} - Listing posts", symbol);
    Json(state.community.posts(&symbol))
}

pub async fn create_post(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Json(data): Json<CreatePost>,
) -> Result<(StatusCode, Json<CommunityPost>), AppError> {
    info!("POST /community/{} - Creating post", symbol);
    let post = state.community.create_post(&symbol, data)
        .map_err(|e| {
            error!("Failed to create post on {}: {}", symbol, e);
            e
        })?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn like_post(
    State(state): State<AppState>,
    Path((symbol, id)): Path<(String, Uuid)>,
) -> Result<Json<CommunityPost>, AppError> {
    info!("POST /community/{}/{}/like", symbol, id);
    let post = state.community.like(&symbol, id)
        .map_err(|e| {
            error!("Failed to like post {}: {}", id, e);
            e
        })?;
    Ok(Json(post))
}
