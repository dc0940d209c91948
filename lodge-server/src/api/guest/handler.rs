//! Guest API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Guest, GuestCreate, GuestUpdate, Reservation};
use shared::request::{ListQuery, Page};
use shared::util::now_millis;

use crate::api::{ApiResult, ValidatedJson};
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::new(ErrorCode::GuestNotFound)
}

/// GET /api/guests?search=&page=&per_page=
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Page<Guest>> {
    let (guests, total) = db::guests::list(&state.pool, current.account_id, &query).await?;
    Ok(Json(Page::new(guests, total, &query.pagination())))
}

/// GET /api/guests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Guest> {
    let guest = db::guests::find(&state.pool, current.account_id, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(guest))
}

/// POST /api/guests
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<GuestCreate>,
) -> ApiResult<Guest> {
    let guest = db::guests::create(&state.pool, current.account_id, &payload, now_millis()).await?;
    Ok(Json(guest))
}

/// PUT /api/guests/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<GuestUpdate>,
) -> ApiResult<Guest> {
    let guest = db::guests::update(&state.pool, current.account_id, id, &payload)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(guest))
}

/// GET /api/guests/{id}/reservations - stay history, newest first
pub async fn history(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<Vec<Reservation>> {
    db::guests::find(&state.pool, current.account_id, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(
        db::guests::stay_history(&state.pool, current.account_id, id).await?,
    ))
}

/// DELETE /api/guests/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    db::guests::find(&state.pool, current.account_id, id)
        .await?
        .ok_or_else(not_found)?;
    if db::guests::has_reservations(&state.pool, id).await? {
        return Err(AppError::new(ErrorCode::GuestHasReservations));
    }
    if !db::guests::delete(&state.pool, current.account_id, id).await? {
        return Err(not_found());
    }
    Ok(Json(ApiResponse::ok()))
}
