pub mod health;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use crate::candidate::handlers;
use crate::dump::fetch_all;
use crate::errors::AppError;
use crate::state::AppState;
use crate::summary::handlers::handle_generate_summary;

/// GET /api/v1/data
async fn handle_get_data(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let data = fetch_all(state.store.as_ref(), &state.config.bucket).await?;
    Ok(Json(data))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/data", get(handle_get_data))
        .route("/api/v1/candidates", post(handlers::handle_create_candidate))
        .route(
            "/api/v1/candidates/:id/cv",
            post(handlers::handle_process_text),
        )
        .route(
            "/api/v1/candidates/:id/cv/upload",
            post(handlers::handle_process_upload),
        )
        .route("/api/v1/summary", post(handle_generate_summary))
        .with_state(state)
}
