use axum::{extract::State, Json};

use crate::models::section::ReferenceSection;
use crate::state::AppState;

/// GET /api/protocol/sections
pub async fn handle_list_sections(State(state): State<AppState>) -> Json<Vec<ReferenceSection>> {
    Json(state.corpus.sections().to_vec())
}
