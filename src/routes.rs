use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::websockets::websocket_handler;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

/// The page and liveness routes never touch room membership; all room state
/// flows over `/ws`.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Welcome to the LiveBoard relay!" }))
        .route("/health", get(health))
        .route("/ws", get(websocket_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "LiveBoard relay is running!".to_string(),
    })
}
