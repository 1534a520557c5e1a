use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::metric::{MetricSample, NewMetricSample};
use crate::routes::parse_id;
use crate::state::AppState;
use crate::store::StoreError;

/// POST /api/users/:id/metrics
pub async fn handle_record_metric(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<NewMetricSample>, JsonRejection>,
) -> Result<(StatusCode, Json<MetricSample>), AppError> {
    let user_id = parse_id(&user_id)?;
    let Json(sample) = payload?;
    match state.store.record_metric(user_id, &sample).await {
        Ok(stored) => Ok((StatusCode::CREATED, Json(stored))),
        Err(StoreError::UnknownUser(_)) => Err(AppError::NotFound("User not found".to_string())),
        Err(e) => Err(AppError::store("Failed to record metrics")(e)),
    }
}

/// GET /api/users/:id/metrics
///
/// Latest samples first.
pub async fn handle_list_metrics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<MetricSample>>, AppError> {
    let user_id = parse_id(&user_id)?;
    let user = state
        .store
        .get_user(user_id)
        .await
        .map_err(AppError::store("Failed to fetch metrics"))?;
    if user.is_none() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let samples = state
        .store
        .list_metrics(user_id)
        .await
        .map_err(AppError::store("Failed to fetch metrics"))?;
    Ok(Json(samples))
}
