pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use crate::corpus::handlers as corpus_handlers;
use crate::errors::AppError;
use crate::routine::handlers as routine_handlers;
use crate::state::AppState;
use crate::tracking::handlers as tracking_handlers;

/// Parses a path identifier, rejecting malformed ids with 400 instead of 404.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid id '{raw}'")))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/routines",
            post(routine_handlers::handle_create_routine),
        )
        .route(
            "/api/routines/:id",
            get(routine_handlers::handle_get_routine),
        )
        .route("/api/users/:id", get(routine_handlers::handle_get_user))
        .route(
            "/api/users/:id/metrics",
            get(tracking_handlers::handle_list_metrics).post(tracking_handlers::handle_record_metric),
        )
        .route(
            "/api/protocol/sections",
            get(corpus_handlers::handle_list_sections),
        )
        .with_state(state)
}
