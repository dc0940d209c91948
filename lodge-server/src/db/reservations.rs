//! Reservation storage and lifecycle
//!
//! Bookings and stay changes run in one transaction that first locks the
//! room type row, so two requests for the same type are serialized and the
//! room/capacity checks below cannot race. The `EXCLUDE` constraint on
//! `reservations` rejects any double-booked room that slips through.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ChargeKind, Guest, Reservation, ReservationDetail, ReservationQuery, ReservationStatus,
    RoomStatus,
};
use sqlx::{PgConnection, PgExecutor, PgPool};

use super::{availability, folio, room_types, rooms};
use crate::error::ServiceResult;

/// A fully priced and validated stay, ready to store
#[derive(Debug, Clone)]
pub struct StayPlan<'a> {
    pub property_id: i64,
    pub guest_id: i64,
    pub room_type_id: i64,
    pub room_id: Option<i64>,
    pub rate_plan_id: Option<i64>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub nightly_rate: Decimal,
    pub nights: i64,
    pub total_amount: Decimal,
    pub source: Option<&'a str>,
    pub notes: Option<&'a str>,
}

impl StayPlan<'_> {
    fn room_charge_description(&self) -> String {
        let unit = if self.nights == 1 { "night" } else { "nights" };
        format!("Room: {} {unit} at {}", self.nights, self.nightly_rate)
    }
}

fn transition_error(from: ReservationStatus, to: ReservationStatus) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!(
            "Reservation cannot move from {} to {}",
            from.as_db(),
            to.as_db()
        ),
    )
}

fn current_status(reservation: &Reservation) -> ServiceResult<ReservationStatus> {
    reservation.status().ok_or_else(|| {
        AppError::internal(format!(
            "reservation {} has unknown status {:?}",
            reservation.id, reservation.status
        ))
        .into()
    })
}

/// Lock the room type and check the room and per-night capacity
async fn reserve_inventory(
    conn: &mut PgConnection,
    plan: &StayPlan<'_>,
    exclude_reservation: Option<i64>,
) -> ServiceResult<()> {
    room_types::lock(&mut *conn, plan.property_id, plan.room_type_id)
        .await?
        .ok_or(ErrorCode::RoomTypeNotFound)?;

    if let Some(room_id) = plan.room_id
        && !availability::room_is_free(
            &mut *conn,
            room_id,
            plan.check_in,
            plan.check_out,
            exclude_reservation,
        )
        .await?
    {
        return Err(AppError::new(ErrorCode::RoomUnavailable)
            .with_detail("room_id", room_id)
            .into());
    }

    let sellable = availability::sellable_rooms(&mut *conn, plan.room_type_id).await?;
    let booked = availability::peak_booked(
        &mut *conn,
        plan.room_type_id,
        plan.check_in,
        plan.check_out,
        exclude_reservation,
    )
    .await?;
    if booked >= sellable {
        tracing::info!(
            room_type_id = plan.room_type_id,
            booked,
            sellable,
            "Room type sold out"
        );
        return Err(AppError::new(ErrorCode::RoomTypeSoldOut)
            .with_detail("room_type_id", plan.room_type_id)
            .into());
    }
    Ok(())
}

/// Book a stay and post its room charge
pub async fn create(
    pool: &PgPool,
    plan: &StayPlan<'_>,
    created_by: i64,
    now: i64,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    reserve_inventory(&mut *tx, plan, None).await?;

    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        INSERT INTO reservations (
            property_id, guest_id, room_type_id, room_id, rate_plan_id,
            check_in, check_out, adults, children, status,
            nightly_rate, nights, total_amount, source, notes,
            created_by, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'confirmed', $10, $11, $12, $13, $14, $15, $16, $16)
        RETURNING *
        "#,
    )
    .bind(plan.property_id)
    .bind(plan.guest_id)
    .bind(plan.room_type_id)
    .bind(plan.room_id)
    .bind(plan.rate_plan_id)
    .bind(plan.check_in)
    .bind(plan.check_out)
    .bind(plan.adults)
    .bind(plan.children)
    .bind(plan.nightly_rate)
    .bind(plan.nights as i32)
    .bind(plan.total_amount)
    .bind(plan.source)
    .bind(plan.notes)
    .bind(created_by)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    folio::add_charge(
        &mut *tx,
        &folio::NewCharge {
            reservation_id: reservation.id,
            kind: ChargeKind::Room,
            description: &plan.room_charge_description(),
            amount: plan.total_amount,
            source_order_id: None,
            created_by: Some(created_by),
        },
        now,
    )
    .await?;

    tx.commit().await?;
    Ok(reservation)
}

/// Change an open stay, re-checking inventory without counting itself
pub async fn update(
    pool: &PgPool,
    id: i64,
    plan: &StayPlan<'_>,
    now: i64,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    let existing = lock(&mut *tx, plan.property_id, id)
        .await?
        .ok_or(ErrorCode::ReservationNotFound)?;
    if !current_status(&existing)?.is_active() {
        return Err(ErrorCode::ReservationClosed.into());
    }

    reserve_inventory(&mut *tx, plan, Some(id)).await?;

    let reservation = sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations SET
            room_type_id = $3, room_id = $4, rate_plan_id = $5,
            check_in = $6, check_out = $7, adults = $8, children = $9,
            nightly_rate = $10, nights = $11, total_amount = $12,
            source = $13, notes = $14, updated_at = $15
        WHERE id = $1 AND property_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(plan.property_id)
    .bind(plan.room_type_id)
    .bind(plan.room_id)
    .bind(plan.rate_plan_id)
    .bind(plan.check_in)
    .bind(plan.check_out)
    .bind(plan.adults)
    .bind(plan.children)
    .bind(plan.nightly_rate)
    .bind(plan.nights as i32)
    .bind(plan.total_amount)
    .bind(plan.source)
    .bind(plan.notes)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    folio::update_room_charge(
        &mut *tx,
        id,
        &plan.room_charge_description(),
        plan.total_amount,
    )
    .await?;

    // in-house guest moved rooms
    if existing.status == ReservationStatus::CheckedIn.as_db() && existing.room_id != plan.room_id {
        if let Some(old_room) = existing.room_id {
            rooms::set_status(&mut *tx, plan.property_id, old_room, RoomStatus::Dirty).await?;
        }
        if let Some(new_room) = plan.room_id {
            rooms::set_status(&mut *tx, plan.property_id, new_room, RoomStatus::Occupied).await?;
        }
    }

    tx.commit().await?;
    Ok(reservation)
}

pub async fn find(
    conn: impl PgExecutor<'_>,
    property_id: i64,
    id: i64,
) -> ServiceResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations WHERE id = $1 AND property_id = $2",
    )
    .bind(id)
    .bind(property_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

async fn lock(
    conn: impl PgExecutor<'_>,
    property_id: i64,
    id: i64,
) -> ServiceResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, Reservation>(
        "SELECT * FROM reservations WHERE id = $1 AND property_id = $2 FOR UPDATE",
    )
    .bind(id)
    .bind(property_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

async fn set_status(
    conn: impl PgExecutor<'_>,
    id: i64,
    status: ReservationStatus,
    room_id: Option<i64>,
    now: i64,
) -> ServiceResult<Reservation> {
    let row = sqlx::query_as::<_, Reservation>(
        r#"
        UPDATE reservations SET status = $2, room_id = $3, updated_at = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status.as_db())
    .bind(room_id)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Check a confirmed guest in on `today`, assigning `room_id` if given
pub async fn check_in(
    pool: &PgPool,
    property_id: i64,
    id: i64,
    room_id: Option<i64>,
    today: NaiveDate,
    now: i64,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    let reservation = lock(&mut *tx, property_id, id)
        .await?
        .ok_or(ErrorCode::ReservationNotFound)?;
    let status = current_status(&reservation)?;
    if !status.can_transition_to(ReservationStatus::CheckedIn) {
        return Err(transition_error(status, ReservationStatus::CheckedIn).into());
    }
    if today < reservation.check_in || today >= reservation.check_out {
        return Err(AppError::new(ErrorCode::CheckInOutsideStay)
            .with_detail("check_in", reservation.check_in.to_string())
            .with_detail("check_out", reservation.check_out.to_string())
            .into());
    }

    let room_id = room_id
        .or(reservation.room_id)
        .ok_or(ErrorCode::RoomNotAssigned)?;
    let room = rooms::find(&mut *tx, property_id, room_id)
        .await?
        .ok_or(ErrorCode::RoomNotFound)?;
    if room.room_type_id != reservation.room_type_id {
        return Err(AppError::with_message(
            ErrorCode::InvalidRequest,
            "Room is not of the reserved room type",
        )
        .into());
    }
    match room.status() {
        Some(RoomStatus::OutOfService) => return Err(ErrorCode::RoomOutOfService.into()),
        Some(RoomStatus::Occupied) => {
            return Err(AppError::new(ErrorCode::RoomUnavailable)
                .with_detail("room_id", room_id)
                .into());
        }
        _ => {}
    }
    if Some(room_id) != reservation.room_id
        && !availability::room_is_free(
            &mut *tx,
            room_id,
            reservation.check_in,
            reservation.check_out,
            Some(id),
        )
        .await?
    {
        return Err(AppError::new(ErrorCode::RoomUnavailable)
            .with_detail("room_id", room_id)
            .into());
    }

    let updated = set_status(
        &mut *tx,
        id,
        ReservationStatus::CheckedIn,
        Some(room_id),
        now,
    )
    .await?;
    rooms::set_status(&mut *tx, property_id, room_id, RoomStatus::Occupied).await?;

    tx.commit().await?;
    Ok(updated)
}

/// Check out an in-house guest; the folio must be settled
pub async fn check_out(
    pool: &PgPool,
    property_id: i64,
    id: i64,
    now: i64,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    let reservation = lock(&mut *tx, property_id, id)
        .await?
        .ok_or(ErrorCode::ReservationNotFound)?;
    let status = current_status(&reservation)?;
    if !status.can_transition_to(ReservationStatus::CheckedOut) {
        return Err(transition_error(status, ReservationStatus::CheckedOut).into());
    }

    let balance = folio::balance(&mut *tx, id).await?;
    if balance > Decimal::ZERO {
        return Err(AppError::new(ErrorCode::FolioUnsettled)
            .with_detail("balance", balance.to_string())
            .into());
    }

    let updated = set_status(
        &mut *tx,
        id,
        ReservationStatus::CheckedOut,
        reservation.room_id,
        now,
    )
    .await?;
    if let Some(room_id) = reservation.room_id {
        rooms::set_status(&mut *tx, property_id, room_id, RoomStatus::Dirty).await?;
    }

    tx.commit().await?;
    Ok(updated)
}

/// Cancel or mark no-show; releases inventory and voids the room charge
pub async fn close(
    pool: &PgPool,
    property_id: i64,
    id: i64,
    to: ReservationStatus,
    now: i64,
) -> ServiceResult<Reservation> {
    let mut tx = pool.begin().await?;

    let reservation = lock(&mut *tx, property_id, id)
        .await?
        .ok_or(ErrorCode::ReservationNotFound)?;
    let status = current_status(&reservation)?;
    if !matches!(to, ReservationStatus::Cancelled | ReservationStatus::NoShow)
        || !status.can_transition_to(to)
    {
        return Err(transition_error(status, to).into());
    }

    let updated = set_status(&mut *tx, id, to, reservation.room_id, now).await?;
    folio::void_room_charges(&mut *tx, id).await?;

    tx.commit().await?;
    Ok(updated)
}

/// Delete a reservation that is not in house
pub async fn delete(pool: &PgPool, property_id: i64, id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let reservation = lock(&mut *tx, property_id, id)
        .await?
        .ok_or(ErrorCode::ReservationNotFound)?;
    if current_status(&reservation)? == ReservationStatus::CheckedIn {
        return Err(ErrorCode::ReservationInProgress.into());
    }

    sqlx::query("DELETE FROM reservations WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Filtered list; `from`/`to` select stays overlapping that window
pub async fn list(
    pool: &PgPool,
    property_id: i64,
    query: &ReservationQuery,
) -> ServiceResult<(Vec<Reservation>, i64)> {
    let page = query.pagination();
    let filter = r#"
        WHERE property_id = $1
          AND ($2::text IS NULL OR status = $2)
          AND ($3::date IS NULL OR check_out > $3)
          AND ($4::date IS NULL OR check_in < $4)
          AND ($5::bigint IS NULL OR guest_id = $5)
    "#;
    let status = query.status.map(|s| s.as_db());

    let rows = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT * FROM reservations {filter} ORDER BY check_in, id LIMIT $6 OFFSET $7"
    ))
    .bind(property_id)
    .bind(status)
    .bind(query.from)
    .bind(query.to)
    .bind(query.guest_id)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM reservations {filter}"))
        .bind(property_id)
        .bind(status)
        .bind(query.from)
        .bind(query.to)
        .bind(query.guest_id)
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}

/// Reservation with guest, room type name, room number and folio balance
pub async fn detail(
    pool: &PgPool,
    property_id: i64,
    id: i64,
) -> ServiceResult<Option<ReservationDetail>> {
    let Some(reservation) = find(pool, property_id, id).await? else {
        return Ok(None);
    };

    let guest = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = $1")
        .bind(reservation.guest_id)
        .fetch_one(pool)
        .await?;
    let (room_type_name, room_number): (String, Option<String>) = sqlx::query_as(
        r#"
        SELECT rt.name, r.number
        FROM room_types rt
        LEFT JOIN rooms r ON r.id = $2
        WHERE rt.id = $1
        "#,
    )
    .bind(reservation.room_type_id)
    .bind(reservation.room_id)
    .fetch_one(pool)
    .await?;
    let balance = folio::balance(pool, id).await?;

    Ok(Some(ReservationDetail {
        reservation,
        guest,
        room_type_name,
        room_number,
        balance,
    }))
}
