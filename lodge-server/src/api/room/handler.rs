//! Room API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Room, RoomCreate, RoomQuery, RoomStatus, RoomStatusUpdate, RoomUpdate};
use shared::util::{now_millis, today};

use crate::api::{ApiResult, ValidatedJson, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::license::LicenseSnapshot;
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::new(ErrorCode::RoomNotFound)
}

async fn find_room(state: &AppState, property_id: i64, id: i64) -> Result<Room, AppError> {
    Ok(db::rooms::find(&state.pool, property_id, id)
        .await?
        .ok_or_else(not_found)?)
}

/// The room type must belong to the same property
async fn verify_room_type(
    state: &AppState,
    property_id: i64,
    room_type_id: i64,
) -> Result<(), AppError> {
    db::room_types::find(&state.pool, property_id, room_type_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoomTypeNotFound))?;
    Ok(())
}

/// GET /api/properties/{property_id}/rooms?status=&room_type_id=
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
    Query(query): Query<RoomQuery>,
) -> ApiResult<Vec<Room>> {
    verify_property(&state, &current, property_id).await?;
    Ok(Json(db::rooms::list(&state.pool, property_id, &query).await?))
}

/// GET /api/properties/{property_id}/rooms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<Room> {
    verify_property(&state, &current, property_id).await?;
    Ok(Json(find_room(&state, property_id, id).await?))
}

/// POST /api/properties/{property_id}/rooms
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(license): Extension<LicenseSnapshot>,
    Path(property_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<RoomCreate>,
) -> ApiResult<Room> {
    verify_property(&state, &current, property_id).await?;
    verify_room_type(&state, property_id, payload.room_type_id).await?;
    if payload.status == Some(RoomStatus::Occupied) {
        return Err(AppError::validation("A new room cannot start out occupied"));
    }

    let room = db::rooms::create(
        &state.pool,
        current.account_id,
        property_id,
        &payload,
        |used| license.check_room_quota(used),
        now_millis(),
    )
    .await?;
    tracing::debug!(property_id, room_id = room.id, number = %room.number, "Room created");
    Ok(Json(room))
}

/// PUT /api/properties/{property_id}/rooms/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<RoomUpdate>,
) -> ApiResult<Room> {
    verify_property(&state, &current, property_id).await?;
    let room = find_room(&state, property_id, id).await?;

    if let Some(room_type_id) = payload.room_type_id
        && room_type_id != room.room_type_id
    {
        verify_room_type(&state, property_id, room_type_id).await?;
    }

    let room = db::rooms::update(&state.pool, property_id, id, &payload, today())
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(room))
}

/// PATCH /api/properties/{property_id}/rooms/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<RoomStatusUpdate>,
) -> ApiResult<Room> {
    verify_property(&state, &current, property_id).await?;
    let room = find_room(&state, property_id, id).await?;
    let status = room
        .status()
        .ok_or_else(|| AppError::internal(format!("room {id} has unknown status")))?;

    if !status.can_set_manually(payload.status) {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!(
                "Room cannot move from {} to {}",
                status.as_db(),
                payload.status.as_db()
            ),
        ));
    }

    let room = db::rooms::set_status(&state.pool, property_id, id, payload.status)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(
        property_id,
        room_id = id,
        user_id = current.id,
        from = status.as_db(),
        to = payload.status.as_db(),
        "Room status changed"
    );
    Ok(Json(room))
}

/// DELETE /api/properties/{property_id}/rooms/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<ApiResponse<()>> {
    verify_property(&state, &current, property_id).await?;
    if !db::rooms::delete(&state.pool, property_id, id, today()).await? {
        return Err(not_found());
    }
    Ok(Json(ApiResponse::ok()))
}
