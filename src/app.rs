use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{assistant, community, health, market, portfolio};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/health", health::router())
        .nest("/api/portfolio", portfolio::router())
        .nest("/api/market", market::router())
        .nest("/api/stocks", market::stocks_router())
        .nest("/api/community", community::router())
        .nest("/api/assistant", assistant::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
