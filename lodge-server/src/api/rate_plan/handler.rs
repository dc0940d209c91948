//! Rate Plan API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{RatePlan, RatePlanCreate, RatePlanUpdate};
use shared::util::now_millis;

use crate::api::{ApiResult, ValidatedJson, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::new(ErrorCode::RatePlanNotFound)
}

async fn verify_room_type(
    state: &AppState,
    property_id: i64,
    room_type_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(room_type_id) = room_type_id {
        db::room_types::find(&state.pool, property_id, room_type_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::RoomTypeNotFound))?;
    }
    Ok(())
}

/// GET /api/properties/{property_id}/rate-plans
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
) -> ApiResult<Vec<RatePlan>> {
    verify_property(&state, &current, property_id).await?;
    Ok(Json(db::rate_plans::list(&state.pool, property_id).await?))
}

/// GET /api/properties/{property_id}/rate-plans/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<RatePlan> {
    verify_property(&state, &current, property_id).await?;
    let plan = db::rate_plans::find(&state.pool, property_id, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(plan))
}

/// POST /api/properties/{property_id}/rate-plans
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RatePlanCreate>,
) -> ApiResult<RatePlan> {
    verify_property(&state, &current, property_id).await?;
    verify_room_type(&state, property_id, payload.room_type_id).await?;
    let plan = db::rate_plans::create(&state.pool, property_id, &payload, now_millis()).await?;
    Ok(Json(plan))
}

/// PUT /api/properties/{property_id}/rate-plans/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<RatePlanUpdate>,
) -> ApiResult<RatePlan> {
    verify_property(&state, &current, property_id).await?;
    verify_room_type(&state, property_id, payload.room_type_id).await?;
    let plan = db::rate_plans::update(&state.pool, property_id, id, &payload)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(plan))
}

/// DELETE /api/properties/{property_id}/rate-plans/{id}
///
/// Reservations keep their stored rate; the plan reference is cleared.
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<ApiResponse<()>> {
    verify_property(&state, &current, property_id).await?;
    if !db::rate_plans::delete(&state.pool, property_id, id).await? {
        return Err(not_found());
    }
    Ok(Json(ApiResponse::ok()))
}
