//! Room Type API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{RoomType, RoomTypeCreate, RoomTypeUpdate};
use shared::util::now_millis;

use crate::api::{ApiResult, ValidatedJson, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::new(ErrorCode::RoomTypeNotFound)
}

/// GET /api/properties/{property_id}/room-types
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
) -> ApiResult<Vec<RoomType>> {
    verify_property(&state, &current, property_id).await?;
    Ok(Json(db::room_types::list(&state.pool, property_id).await?))
}

/// GET /api/properties/{property_id}/room-types/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<RoomType> {
    verify_property(&state, &current, property_id).await?;
    let room_type = db::room_types::find(&state.pool, property_id, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(room_type))
}

/// POST /api/properties/{property_id}/room-types
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RoomTypeCreate>,
) -> ApiResult<RoomType> {
    verify_property(&state, &current, property_id).await?;
    let room_type =
        db::room_types::create(&state.pool, property_id, &payload, now_millis()).await?;
    Ok(Json(room_type))
}

/// PUT /api/properties/{property_id}/room-types/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<RoomTypeUpdate>,
) -> ApiResult<RoomType> {
    verify_property(&state, &current, property_id).await?;
    let room_type = db::room_types::update(&state.pool, property_id, id, &payload)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(room_type))
}

/// DELETE /api/properties/{property_id}/room-types/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<ApiResponse<()>> {
    verify_property(&state, &current, property_id).await?;
    db::room_types::find(&state.pool, property_id, id)
        .await?
        .ok_or_else(not_found)?;
    if db::room_types::is_in_use(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::RoomTypeInUse));
    }
    if !db::room_types::delete(&state.pool, property_id, id).await? {
        return Err(not_found());
    }
    Ok(Json(ApiResponse::ok()))
}
