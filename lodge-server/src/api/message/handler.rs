//! Guest Message API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{GuestMessage, MessageCreate};
use shared::util::now_millis;

use crate::api::{ApiResult, ValidatedJson, find_reservation, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;

/// GET .../reservations/{reservation_id}/messages - oldest first
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id)): Path<(i64, i64)>,
) -> ApiResult<Vec<GuestMessage>> {
    verify_property(&state, &current, property_id).await?;
    find_reservation(&state, property_id, reservation_id).await?;
    Ok(Json(db::messages::list(&state.pool, reservation_id).await?))
}

/// POST .../reservations/{reservation_id}/messages
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<MessageCreate>,
) -> ApiResult<GuestMessage> {
    verify_property(&state, &current, property_id).await?;
    find_reservation(&state, property_id, reservation_id).await?;

    let message =
        db::messages::create(&state.pool, reservation_id, &payload, current.id, now_millis())
            .await?;
    tracing::debug!(
        reservation_id,
        message_id = message.id,
        direction = %message.direction,
        "Guest message recorded"
    );
    Ok(Json(message))
}

/// POST .../messages/{message_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id, message_id)): Path<(i64, i64, i64)>,
) -> ApiResult<GuestMessage> {
    verify_property(&state, &current, property_id).await?;
    find_reservation(&state, property_id, reservation_id).await?;

    let message = db::messages::mark_read(&state.pool, reservation_id, message_id, now_millis())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MessageNotFound))?;
    Ok(Json(message))
}
