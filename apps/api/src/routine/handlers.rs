//! Axum route handlers for the Routine API.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::models::routine::Routine;
use crate::models::user::{NewUser, User};
use crate::routes::parse_id;
use crate::routine::generator::generate_routine;
use crate::state::AppState;

/// POST /api/routines
///
/// Generates a routine from the questionnaire answers, the template and the
/// cached corpus, then stores the answers as a new user together with the
/// routine in one write and returns the routine.
pub async fn handle_create_routine(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<Routine>, AppError> {
    let Json(submission) = payload?;
    submission.validate()?;

    let matched = state.matcher.match_components(&state.corpus);
    let draft = generate_routine(
        submission.preference_tags(),
        &state.template,
        &matched,
        &state.config.protocol_url,
    );

    let (user, routine) = state
        .store
        .create_submission(&submission, &draft)
        .await
        .map_err(AppError::store("Failed to create routine"))?;

    info!(
        "Created routine {} for user {} ({} embedded sections)",
        routine.id,
        user.id,
        routine.draft.embedded_sections.len()
    );

    Ok(Json(routine))
}

/// GET /api/routines/:id
pub async fn handle_get_routine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Routine>, AppError> {
    let id = parse_id(&id)?;
    let routine = state
        .store
        .get_routine(id)
        .await
        .map_err(AppError::store("Failed to fetch routine"))?
        .ok_or_else(|| AppError::NotFound("Routine not found".to_string()))?;
    Ok(Json(routine))
}

/// GET /api/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    let user = state
        .store
        .get_user(id)
        .await
        .map_err(AppError::store("Failed to fetch user"))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}
