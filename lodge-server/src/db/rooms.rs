//! Room operations

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{Room, RoomCreate, RoomQuery, RoomStatus, RoomUpdate};
use sqlx::{PgConnection, PgExecutor, PgPool};

use super::{ACTIVE_STATUSES, availability, licenses, room_types};
use crate::error::{ServiceResult, on_conflict};

pub async fn list(pool: &PgPool, property_id: i64, query: &RoomQuery) -> ServiceResult<Vec<Room>> {
    let rows = sqlx::query_as::<_, Room>(
        r#"
        SELECT * FROM rooms
        WHERE property_id = $1
          AND ($2::text IS NULL OR status = $2)
          AND ($3::bigint IS NULL OR room_type_id = $3)
        ORDER BY number
        "#,
    )
    .bind(property_id)
    .bind(query.status.map(|s| s.as_db()))
    .bind(query.room_type_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find(
    conn: impl PgExecutor<'_>,
    property_id: i64,
    id: i64,
) -> ServiceResult<Option<Room>> {
    let row = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1 AND property_id = $2")
        .bind(id)
        .bind(property_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

/// Rooms across all properties of the account (license quota)
pub async fn count_for_account(conn: impl PgExecutor<'_>, account_id: i64) -> ServiceResult<i64> {
    let (n,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM rooms r
        JOIN properties p ON p.id = r.property_id
        WHERE p.account_id = $1
        "#,
    )
    .bind(account_id)
    .fetch_one(conn)
    .await?;
    Ok(n)
}

/// Insert a room if `quota` admits one more over the account's room count
pub async fn create(
    pool: &PgPool,
    account_id: i64,
    property_id: i64,
    data: &RoomCreate,
    quota: impl FnOnce(i64) -> Result<(), AppError>,
    now: i64,
) -> ServiceResult<Room> {
    let mut tx = pool.begin().await?;
    licenses::lock(&mut *tx, account_id).await?;
    quota(count_for_account(&mut *tx, account_id).await?)?;

    let room = sqlx::query_as::<_, Room>(
        r#"
        INSERT INTO rooms (property_id, room_type_id, number, floor, status, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(property_id)
    .bind(data.room_type_id)
    .bind(data.number.trim())
    .bind(data.floor)
    .bind(data.status.unwrap_or(RoomStatus::Available).as_db())
    .bind(&data.notes)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| on_conflict(ErrorCode::RoomNumberExists)(e.into()))?;
    tx.commit().await?;
    Ok(room)
}

/// Apply a room edit; moving the room to another type must leave its
/// current type able to carry the bookings already sold from `from` on
pub async fn update(
    pool: &PgPool,
    property_id: i64,
    id: i64,
    data: &RoomUpdate,
    from: NaiveDate,
) -> ServiceResult<Option<Room>> {
    let mut tx = pool.begin().await?;
    let Some(existing) = find(&mut *tx, property_id, id).await? else {
        return Ok(None);
    };
    if data.room_type_id.is_some_and(|t| t != existing.room_type_id) {
        ensure_releasable(&mut *tx, &existing, from).await?;
    }

    let room = sqlx::query_as::<_, Room>(
        r#"
        UPDATE rooms SET
            room_type_id = COALESCE($3, room_type_id),
            number = COALESCE($4, number),
            floor = COALESCE($5, floor),
            notes = COALESCE($6, notes)
        WHERE id = $1 AND property_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(property_id)
    .bind(data.room_type_id)
    .bind(data.number.as_deref().map(str::trim))
    .bind(data.floor)
    .bind(&data.notes)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| on_conflict(ErrorCode::RoomNumberExists)(e.into()))?;
    tx.commit().await?;
    Ok(room)
}

pub async fn set_status(
    conn: impl PgExecutor<'_>,
    property_id: i64,
    id: i64,
    status: RoomStatus,
) -> ServiceResult<Option<Room>> {
    let row = sqlx::query_as::<_, Room>(
        "UPDATE rooms SET status = $3 WHERE id = $1 AND property_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(property_id)
    .bind(status.as_db())
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// A confirmed or in-house reservation holds the room
pub async fn has_active_reservations(
    conn: impl PgExecutor<'_>,
    id: i64,
) -> ServiceResult<bool> {
    let (exists,): (bool,) = sqlx::query_as(&format!(
        "SELECT EXISTS (SELECT 1 FROM reservations WHERE room_id = $1 AND status IN {ACTIVE_STATUSES})"
    ))
    .bind(id)
    .fetch_one(conn)
    .await?;
    Ok(exists)
}

/// Taking `room` out of its type must not strand a booking
///
/// Locks the room type first, the same lock bookings take, then refuses
/// when the room itself is assigned or when unassigned bookings on some
/// night from `from` on would outnumber the type's other in-service rooms.
async fn ensure_releasable(
    conn: &mut PgConnection,
    room: &Room,
    from: NaiveDate,
) -> ServiceResult<()> {
    room_types::lock(&mut *conn, room.property_id, room.room_type_id).await?;

    if has_active_reservations(&mut *conn, room.id).await? {
        return Err(ErrorCode::RoomInUse.into());
    }
    if availability::overbooked_without(&mut *conn, room.room_type_id, room.id, from).await? {
        return Err(AppError::with_message(
            ErrorCode::RoomInUse,
            "Bookings of this room type still need the room",
        )
        .with_detail("room_type_id", room.room_type_id)
        .into());
    }
    Ok(())
}

pub async fn delete(
    pool: &PgPool,
    property_id: i64,
    id: i64,
    from: NaiveDate,
) -> ServiceResult<bool> {
    let mut tx = pool.begin().await?;
    let Some(room) = find(&mut *tx, property_id, id).await? else {
        return Ok(false);
    };
    ensure_releasable(&mut *tx, &room, from).await?;

    let result = sqlx::query("DELETE FROM rooms WHERE id = $1 AND property_id = $2")
        .bind(id)
        .bind(property_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}
