//! Service requests and in-room orders

use shared::error::{AppError, ErrorCode};
use shared::models::{
    ChargeKind, GuestOrder, GuestOrderItem, OrderCreate, OrderDetail, OrderStatus,
    RequestStatus, ServiceRequest, ServiceRequestCreate,
};
use sqlx::PgPool;

use super::folio;
use crate::error::ServiceResult;

// ── Service requests ──

pub async fn create_request(
    pool: &PgPool,
    reservation_id: i64,
    data: &ServiceRequestCreate,
    now: i64,
) -> ServiceResult<ServiceRequest> {
    let row = sqlx::query_as::<_, ServiceRequest>(
        r#"
        INSERT INTO service_requests (reservation_id, category, description, priority, status, created_at)
        VALUES ($1, $2, $3, $4, 'open', $5)
        RETURNING *
        "#,
    )
    .bind(reservation_id)
    .bind(data.category.as_db())
    .bind(data.description.trim())
    .bind(data.priority.as_db())
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn list_requests_for_reservation(
    pool: &PgPool,
    reservation_id: i64,
) -> ServiceResult<Vec<ServiceRequest>> {
    let rows = sqlx::query_as::<_, ServiceRequest>(
        "SELECT * FROM service_requests WHERE reservation_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Property-wide queue, high priority first
pub async fn list_requests_for_property(
    pool: &PgPool,
    property_id: i64,
    status: Option<RequestStatus>,
) -> ServiceResult<Vec<ServiceRequest>> {
    let rows = sqlx::query_as::<_, ServiceRequest>(
        r#"
        SELECT sr.* FROM service_requests sr
        JOIN reservations r ON r.id = sr.reservation_id
        WHERE r.property_id = $1 AND ($2::text IS NULL OR sr.status = $2)
        ORDER BY CASE sr.priority WHEN 'high' THEN 0 WHEN 'normal' THEN 1 ELSE 2 END,
                 sr.created_at
        "#,
    )
    .bind(property_id)
    .bind(status.map(|s| s.as_db()))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_request(
    pool: &PgPool,
    property_id: i64,
    id: i64,
) -> ServiceResult<Option<ServiceRequest>> {
    let row = sqlx::query_as::<_, ServiceRequest>(
        r#"
        SELECT sr.* FROM service_requests sr
        JOIN reservations r ON r.id = sr.reservation_id
        WHERE sr.id = $1 AND r.property_id = $2
        "#,
    )
    .bind(id)
    .bind(property_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Move a request on; fails if someone else changed it first
pub async fn update_request_status(
    pool: &PgPool,
    request: &ServiceRequest,
    next: RequestStatus,
    now: i64,
) -> ServiceResult<ServiceRequest> {
    let completed_at = (next == RequestStatus::Completed).then_some(now);
    sqlx::query_as::<_, ServiceRequest>(
        r#"
        UPDATE service_requests SET status = $3, completed_at = COALESCE($4, completed_at)
        WHERE id = $1 AND status = $2
        RETURNING *
        "#,
    )
    .bind(request.id)
    .bind(&request.status)
    .bind(next.as_db())
    .bind(completed_at)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| stale_status("Service request").into())
}

fn stale_status(what: &str) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!("{what} was changed by someone else, reload and retry"),
    )
}

// ── Orders ──

async fn items_of(pool: &PgPool, order_id: i64) -> ServiceResult<Vec<GuestOrderItem>> {
    let items = sqlx::query_as::<_, GuestOrderItem>(
        "SELECT * FROM guest_order_items WHERE order_id = $1 ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Order with its items, priced from the line totals
pub async fn create_order(
    pool: &PgPool,
    reservation_id: i64,
    data: &OrderCreate,
    now: i64,
) -> ServiceResult<OrderDetail> {
    let out_of_range =
        || AppError::with_message(ErrorCode::ValueOutOfRange, "Order total is too large");
    let total = data.total().ok_or_else(out_of_range)?;

    let mut tx = pool.begin().await?;

    let order = sqlx::query_as::<_, GuestOrder>(
        r#"
        INSERT INTO guest_orders (reservation_id, status, total_amount, notes, created_at)
        VALUES ($1, 'pending', $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(reservation_id)
    .bind(total)
    .bind(&data.notes)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(data.items.len());
    for item in &data.items {
        let row = sqlx::query_as::<_, GuestOrderItem>(
            r#"
            INSERT INTO guest_order_items (order_id, name, quantity, unit_price, line_total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(item.name.trim())
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.line_total().ok_or_else(out_of_range)?)
        .fetch_one(&mut *tx)
        .await?;
        items.push(row);
    }

    tx.commit().await?;
    Ok(OrderDetail { order, items })
}

pub async fn list_orders_for_reservation(
    pool: &PgPool,
    reservation_id: i64,
) -> ServiceResult<Vec<GuestOrder>> {
    let rows = sqlx::query_as::<_, GuestOrder>(
        "SELECT * FROM guest_orders WHERE reservation_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_orders_for_property(
    pool: &PgPool,
    property_id: i64,
    status: Option<OrderStatus>,
) -> ServiceResult<Vec<GuestOrder>> {
    let rows = sqlx::query_as::<_, GuestOrder>(
        r#"
        SELECT o.* FROM guest_orders o
        JOIN reservations r ON r.id = o.reservation_id
        WHERE r.property_id = $1 AND ($2::text IS NULL OR o.status = $2)
        ORDER BY o.created_at, o.id
        "#,
    )
    .bind(property_id)
    .bind(status.map(|s| s.as_db()))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_order(
    pool: &PgPool,
    property_id: i64,
    id: i64,
) -> ServiceResult<Option<OrderDetail>> {
    let order = sqlx::query_as::<_, GuestOrder>(
        r#"
        SELECT o.* FROM guest_orders o
        JOIN reservations r ON r.id = o.reservation_id
        WHERE o.id = $1 AND r.property_id = $2
        "#,
    )
    .bind(id)
    .bind(property_id)
    .fetch_optional(pool)
    .await?;

    let Some(order) = order else {
        return Ok(None);
    };
    let items = items_of(pool, order.id).await?;
    Ok(Some(OrderDetail { order, items }))
}

/// Move an order on; delivery posts the room-service charge in the same transaction
pub async fn update_order_status(
    pool: &PgPool,
    order: &GuestOrder,
    next: OrderStatus,
    user_id: i64,
    now: i64,
) -> ServiceResult<GuestOrder> {
    let mut tx = pool.begin().await?;

    let delivered_at = (next == OrderStatus::Delivered).then_some(now);
    let updated = sqlx::query_as::<_, GuestOrder>(
        r#"
        UPDATE guest_orders SET status = $3, delivered_at = COALESCE($4, delivered_at)
        WHERE id = $1 AND status = $2
        RETURNING *
        "#,
    )
    .bind(order.id)
    .bind(&order.status)
    .bind(next.as_db())
    .bind(delivered_at)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| stale_status("Order"))?;

    if next == OrderStatus::Delivered {
        folio::add_charge(
            &mut *tx,
            &folio::NewCharge {
                reservation_id: updated.reservation_id,
                kind: ChargeKind::RoomService,
                description: &format!("Room service order #{}", updated.id),
                amount: updated.total_amount,
                source_order_id: Some(updated.id),
                created_by: Some(user_id),
            },
            now,
        )
        .await?;
    }

    tx.commit().await?;
    Ok(updated)
}
