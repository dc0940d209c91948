//! Reservation API Handlers
//!
//! Handlers validate and price a stay into a [`StayPlan`]; the storage
//! layer owns the locking and the inventory checks.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    CheckInRequest, Reservation, ReservationCreate, ReservationDetail, ReservationQuery,
    ReservationStatus, ReservationUpdate, stay,
};
use shared::request::Page;
use shared::util::{now_millis, today};

use super::pricing;
use crate::api::{ApiResult, ValidatedJson, audit, find_reservation, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::db::reservations::StayPlan;
use crate::state::AppState;

/// Requested stay, before validation and pricing
struct StayRequest<'a> {
    guest_id: i64,
    room_type_id: i64,
    room_id: Option<i64>,
    rate_plan_id: Option<i64>,
    check_in: NaiveDate,
    check_out: NaiveDate,
    adults: i32,
    children: i32,
    /// Rate to charge as is; skips rate plan pricing
    fixed_rate: Option<Decimal>,
    /// Re-check the rate plan against the stay
    check_rate_plan: bool,
    source: Option<&'a str>,
    notes: Option<&'a str>,
}

/// Validate a stay against the property's inventory and price it
async fn plan_stay<'a>(
    state: &AppState,
    current: &CurrentUser,
    property_id: i64,
    req: StayRequest<'a>,
) -> Result<StayPlan<'a>, AppError> {
    let nights = stay::nights(req.check_in, req.check_out)?;

    let room_type = db::room_types::find(&state.pool, property_id, req.room_type_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RoomTypeNotFound))?;

    let guests = req.adults + req.children;
    if guests > room_type.max_occupancy {
        return Err(AppError::with_message(
            ErrorCode::OccupancyExceeded,
            format!(
                "{} sleeps at most {} guests",
                room_type.name, room_type.max_occupancy
            ),
        )
        .with_detail("max_occupancy", room_type.max_occupancy));
    }

    db::guests::find(&state.pool, current.account_id, req.guest_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::GuestNotFound))?;

    if let Some(room_id) = req.room_id {
        let room = db::rooms::find(&state.pool, property_id, room_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::RoomNotFound))?;
        if room.room_type_id != room_type.id {
            return Err(AppError::invalid_request(format!(
                "Room {} is not a {}",
                room.number, room_type.name
            )));
        }
    }

    let rate_plan = match req.rate_plan_id {
        Some(id) if req.check_rate_plan => {
            let plan = db::rate_plans::find(&state.pool, property_id, id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::RatePlanNotFound))?;
            plan.check_applicable(room_type.id, req.check_in, nights)
                .map_err(|m| AppError::with_message(ErrorCode::RatePlanNotApplicable, m.message()))?;
            Some(plan)
        }
        _ => None,
    };

    let nightly_rate =
        pricing::nightly_rate(room_type.base_rate, rate_plan.as_ref(), req.fixed_rate);

    Ok(StayPlan {
        property_id,
        guest_id: req.guest_id,
        room_type_id: room_type.id,
        room_id: req.room_id,
        rate_plan_id: req.rate_plan_id,
        check_in: req.check_in,
        check_out: req.check_out,
        adults: req.adults,
        children: req.children,
        nightly_rate,
        nights,
        total_amount: stay::stay_total(nightly_rate, nights)?,
        source: req.source,
        notes: req.notes,
    })
}

/// GET /api/properties/{property_id}/reservations
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
    Query(query): Query<ReservationQuery>,
) -> ApiResult<Page<Reservation>> {
    verify_property(&state, &current, property_id).await?;
    let (items, total) = db::reservations::list(&state.pool, property_id, &query).await?;
    Ok(Json(Page::new(items, total, &query.pagination())))
}

/// GET /api/properties/{property_id}/reservations/{reservation_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<ReservationDetail> {
    verify_property(&state, &current, property_id).await?;
    let detail = db::reservations::detail(&state.pool, property_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;
    Ok(Json(detail))
}

/// POST /api/properties/{property_id}/reservations
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ReservationCreate>,
) -> ApiResult<Reservation> {
    verify_property(&state, &current, property_id).await?;

    let plan = plan_stay(
        &state,
        &current,
        property_id,
        StayRequest {
            guest_id: payload.guest_id,
            room_type_id: payload.room_type_id,
            room_id: payload.room_id,
            rate_plan_id: payload.rate_plan_id,
            check_in: payload.check_in,
            check_out: payload.check_out,
            adults: payload.adults,
            children: payload.children,
            fixed_rate: payload.nightly_rate,
            check_rate_plan: true,
            source: payload.source.as_deref(),
            notes: payload.notes.as_deref(),
        },
    )
    .await?;

    let reservation =
        db::reservations::create(&state.pool, &plan, current.id, now_millis()).await?;

    tracing::info!(
        property_id,
        reservation_id = reservation.id,
        room_type_id = reservation.room_type_id,
        check_in = %reservation.check_in,
        nights = reservation.nights,
        "Reservation created"
    );
    audit(
        &state,
        &current,
        "reservation.created",
        json!({
            "reservation_id": reservation.id,
            "property_id": property_id,
            "check_in": reservation.check_in,
            "check_out": reservation.check_out,
            "total_amount": reservation.total_amount,
        }),
    )
    .await;
    Ok(Json(reservation))
}

/// PATCH /api/properties/{property_id}/reservations/{reservation_id}
///
/// A new room type or rate plan reprices the stay unless a nightly rate is
/// given; otherwise the booked rate is kept and only the total follows the
/// new dates.
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<ReservationUpdate>,
) -> ApiResult<Reservation> {
    verify_property(&state, &current, property_id).await?;
    let existing = find_reservation(&state, property_id, id).await?;
    let status = existing
        .status()
        .ok_or_else(|| AppError::internal(format!("reservation {id} has unknown status")))?;
    if !status.is_active() {
        return Err(AppError::new(ErrorCode::ReservationClosed));
    }

    let check_in = payload.check_in.unwrap_or(existing.check_in);
    if status == ReservationStatus::CheckedIn && check_in != existing.check_in {
        return Err(AppError::invalid_request(
            "Arrival date cannot change after check-in",
        ));
    }
    let check_out = payload.check_out.unwrap_or(existing.check_out);
    let room_type_id = payload.room_type_id.unwrap_or(existing.room_type_id);
    let rate_plan_id = payload.rate_plan_id.or(existing.rate_plan_id);
    // a room type change drops a room of the old type unless a new one is given
    let room_id = match payload.room_id {
        Some(room_id) => Some(room_id),
        None if room_type_id != existing.room_type_id => None,
        None => existing.room_id,
    };
    if status == ReservationStatus::CheckedIn && room_id.is_none() {
        return Err(AppError::new(ErrorCode::RoomNotAssigned));
    }

    let repriced =
        room_type_id != existing.room_type_id || rate_plan_id != existing.rate_plan_id;
    let dates_changed = check_in != existing.check_in || check_out != existing.check_out;
    let fixed_rate = payload
        .nightly_rate
        .or((!repriced).then_some(existing.nightly_rate));

    let plan = plan_stay(
        &state,
        &current,
        property_id,
        StayRequest {
            guest_id: existing.guest_id,
            room_type_id,
            room_id,
            rate_plan_id,
            check_in,
            check_out,
            adults: payload.adults.unwrap_or(existing.adults),
            children: payload.children.unwrap_or(existing.children),
            fixed_rate,
            check_rate_plan: repriced || dates_changed,
            source: payload.source.as_deref().or(existing.source.as_deref()),
            notes: payload.notes.as_deref().or(existing.notes.as_deref()),
        },
    )
    .await?;

    let reservation = db::reservations::update(&state.pool, id, &plan, now_millis()).await?;

    audit(
        &state,
        &current,
        "reservation.updated",
        json!({
            "reservation_id": id,
            "check_in": reservation.check_in,
            "check_out": reservation.check_out,
            "room_id": reservation.room_id,
            "total_amount": reservation.total_amount,
        }),
    )
    .await;
    Ok(Json(reservation))
}

/// POST /api/properties/{property_id}/reservations/{reservation_id}/check-in
///
/// The body is optional; `room_id` assigns a room at the desk.
pub async fn check_in(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
    payload: Option<ValidatedJson<CheckInRequest>>,
) -> ApiResult<Reservation> {
    verify_property(&state, &current, property_id).await?;
    let room_id = payload.and_then(|ValidatedJson(req)| req.room_id);

    let reservation = db::reservations::check_in(
        &state.pool,
        property_id,
        id,
        room_id,
        today(),
        now_millis(),
    )
    .await?;

    tracing::info!(property_id, reservation_id = id, room_id = ?reservation.room_id, "Guest checked in");
    audit(
        &state,
        &current,
        "reservation.checked_in",
        json!({ "reservation_id": id, "room_id": reservation.room_id }),
    )
    .await;
    Ok(Json(reservation))
}

/// POST /api/properties/{property_id}/reservations/{reservation_id}/check-out
pub async fn check_out(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<Reservation> {
    verify_property(&state, &current, property_id).await?;
    let reservation = db::reservations::check_out(&state.pool, property_id, id, now_millis()).await?;

    tracing::info!(property_id, reservation_id = id, "Guest checked out");
    audit(
        &state,
        &current,
        "reservation.checked_out",
        json!({ "reservation_id": id, "room_id": reservation.room_id }),
    )
    .await;
    Ok(Json(reservation))
}

async fn close(
    state: &AppState,
    current: &CurrentUser,
    property_id: i64,
    id: i64,
    to: ReservationStatus,
) -> ApiResult<Reservation> {
    verify_property(state, current, property_id).await?;
    let reservation =
        db::reservations::close(&state.pool, property_id, id, to, now_millis()).await?;

    tracing::info!(property_id, reservation_id = id, status = to.as_db(), "Reservation closed");
    audit(
        state,
        current,
        &format!("reservation.{}", to.as_db()),
        json!({ "reservation_id": id }),
    )
    .await;
    Ok(Json(reservation))
}

/// POST /api/properties/{property_id}/reservations/{reservation_id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<Reservation> {
    close(&state, &current, property_id, id, ReservationStatus::Cancelled).await
}

/// POST /api/properties/{property_id}/reservations/{reservation_id}/no-show
pub async fn no_show(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<Reservation> {
    close(&state, &current, property_id, id, ReservationStatus::NoShow).await
}

/// DELETE /api/properties/{property_id}/reservations/{reservation_id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, id)): Path<(i64, i64)>,
) -> ApiResult<ApiResponse<()>> {
    verify_property(&state, &current, property_id).await?;
    db::reservations::delete(&state.pool, property_id, id).await?;

    tracing::info!(property_id, reservation_id = id, "Reservation deleted");
    audit(
        &state,
        &current,
        "reservation.deleted",
        json!({ "reservation_id": id, "property_id": property_id }),
    )
    .await;
    Ok(Json(ApiResponse::ok()))
}
