//! Room Service API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    GuestOrder, OrderCreate, OrderDetail, OrderQuery, OrderStatus, OrderStatusUpdate,
    RequestStatus, Reservation, ReservationStatus, ServiceRequest, ServiceRequestCreate,
    ServiceRequestQuery, ServiceRequestStatusUpdate,
};
use shared::util::now_millis;

use crate::api::{ApiResult, ValidatedJson, find_reservation, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;

async fn open_reservation(
    state: &AppState,
    current: &CurrentUser,
    property_id: i64,
    reservation_id: i64,
) -> Result<Reservation, AppError> {
    verify_property(state, current, property_id).await?;
    find_reservation(state, property_id, reservation_id).await
}

fn invalid_transition(what: &str, from: &str, to: &str) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!("{what} cannot move from {from} to {to}"),
    )
}

// ── Service requests ──

/// GET .../reservations/{reservation_id}/requests
pub async fn list_reservation_requests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id)): Path<(i64, i64)>,
) -> ApiResult<Vec<ServiceRequest>> {
    open_reservation(&state, &current, property_id, reservation_id).await?;
    Ok(Json(
        db::room_service::list_requests_for_reservation(&state.pool, reservation_id).await?,
    ))
}

/// POST .../reservations/{reservation_id}/requests
///
/// Accepted while the stay is confirmed or in house.
pub async fn create_request(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<ServiceRequestCreate>,
) -> ApiResult<ServiceRequest> {
    let reservation = open_reservation(&state, &current, property_id, reservation_id).await?;
    if !reservation.status().is_some_and(|s| s.is_active()) {
        return Err(AppError::new(ErrorCode::ReservationClosed));
    }

    let request =
        db::room_service::create_request(&state.pool, reservation_id, &payload, now_millis())
            .await?;
    tracing::info!(
        property_id,
        reservation_id,
        request_id = request.id,
        category = %request.category,
        priority = %request.priority,
        "Service request opened"
    );
    Ok(Json(request))
}

/// GET /api/properties/{property_id}/requests?status=
pub async fn list_requests(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
    Query(query): Query<ServiceRequestQuery>,
) -> ApiResult<Vec<ServiceRequest>> {
    verify_property(&state, &current, property_id).await?;
    Ok(Json(
        db::room_service::list_requests_for_property(&state.pool, property_id, query.status)
            .await?,
    ))
}

/// PATCH /api/properties/{property_id}/requests/{request_id}/status
pub async fn update_request_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, request_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<ServiceRequestStatusUpdate>,
) -> ApiResult<ServiceRequest> {
    verify_property(&state, &current, property_id).await?;
    let request = db::room_service::find_request(&state.pool, property_id, request_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ServiceRequestNotFound))?;

    let status = RequestStatus::from_db(&request.status).ok_or_else(|| {
        AppError::internal(format!("service request {request_id} has unknown status"))
    })?;
    if !status.can_transition_to(payload.status) {
        return Err(invalid_transition(
            "Service request",
            status.as_db(),
            payload.status.as_db(),
        ));
    }

    let updated =
        db::room_service::update_request_status(&state.pool, &request, payload.status, now_millis())
            .await?;
    Ok(Json(updated))
}

// ── Orders ──

/// GET .../reservations/{reservation_id}/orders
pub async fn list_reservation_orders(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id)): Path<(i64, i64)>,
) -> ApiResult<Vec<GuestOrder>> {
    open_reservation(&state, &current, property_id, reservation_id).await?;
    Ok(Json(
        db::room_service::list_orders_for_reservation(&state.pool, reservation_id).await?,
    ))
}

/// POST .../reservations/{reservation_id}/orders - in-house guests only
pub async fn create_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, reservation_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<OrderCreate>,
) -> ApiResult<OrderDetail> {
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    let reservation = open_reservation(&state, &current, property_id, reservation_id).await?;
    if reservation.status() != Some(ReservationStatus::CheckedIn) {
        return Err(AppError::new(ErrorCode::ReservationNotInHouse));
    }

    let order =
        db::room_service::create_order(&state.pool, reservation_id, &payload, now_millis()).await?;
    tracing::info!(
        property_id,
        reservation_id,
        order_id = order.order.id,
        total = %order.order.total_amount,
        "Order placed"
    );
    Ok(Json(order))
}

/// GET /api/properties/{property_id}/orders?status=
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
    Query(query): Query<OrderQuery>,
) -> ApiResult<Vec<GuestOrder>> {
    verify_property(&state, &current, property_id).await?;
    Ok(Json(
        db::room_service::list_orders_for_property(&state.pool, property_id, query.status).await?,
    ))
}

/// GET /api/properties/{property_id}/orders/{order_id}
pub async fn get_order(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, order_id)): Path<(i64, i64)>,
) -> ApiResult<OrderDetail> {
    verify_property(&state, &current, property_id).await?;
    let order = db::room_service::find_order(&state.pool, property_id, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(order))
}

/// PATCH /api/properties/{property_id}/orders/{order_id}/status
pub async fn update_order_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path((property_id, order_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<OrderStatusUpdate>,
) -> ApiResult<GuestOrder> {
    verify_property(&state, &current, property_id).await?;
    let OrderDetail { order, .. } =
        db::room_service::find_order(&state.pool, property_id, order_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let status = OrderStatus::from_db(&order.status)
        .ok_or_else(|| AppError::internal(format!("order {order_id} has unknown status")))?;
    if !status.can_transition_to(payload.status) {
        return Err(invalid_transition(
            "Order",
            status.as_db(),
            payload.status.as_db(),
        ));
    }

    let updated = db::room_service::update_order_status(
        &state.pool,
        &order,
        payload.status,
        current.id,
        now_millis(),
    )
    .await?;
    if payload.status == OrderStatus::Delivered {
        tracing::info!(
            property_id,
            order_id,
            reservation_id = updated.reservation_id,
            "Order delivered and charged"
        );
    }
    Ok(Json(updated))
}
