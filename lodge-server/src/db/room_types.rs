//! Room type operations

use shared::error::ErrorCode;
use shared::models::{RoomType, RoomTypeCreate, RoomTypeUpdate};
use sqlx::{PgExecutor, PgPool};

use crate::error::{ServiceResult, on_conflict};

pub async fn list(pool: &PgPool, property_id: i64) -> ServiceResult<Vec<RoomType>> {
    let rows = sqlx::query_as::<_, RoomType>(
        "SELECT * FROM room_types WHERE property_id = $1 ORDER BY name",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find(
    conn: impl PgExecutor<'_>,
    property_id: i64,
    id: i64,
) -> ServiceResult<Option<RoomType>> {
    let row = sqlx::query_as::<_, RoomType>(
        "SELECT * FROM room_types WHERE id = $1 AND property_id = $2",
    )
    .bind(id)
    .bind(property_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

/// Lock the room type row; bookings of one type are serialized on it
pub async fn lock(
    conn: impl PgExecutor<'_>,
    property_id: i64,
    id: i64,
) -> ServiceResult<Option<RoomType>> {
    let row = sqlx::query_as::<_, RoomType>(
        "SELECT * FROM room_types WHERE id = $1 AND property_id = $2 FOR UPDATE",
    )
    .bind(id)
    .bind(property_id)
    .fetch_optional(conn)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &PgPool,
    property_id: i64,
    data: &RoomTypeCreate,
    now: i64,
) -> ServiceResult<RoomType> {
    sqlx::query_as::<_, RoomType>(
        r#"
        INSERT INTO room_types (property_id, name, description, base_rate, max_occupancy, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(property_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.base_rate)
    .bind(data.max_occupancy)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| on_conflict(ErrorCode::RoomTypeNameExists)(e.into()))
}

pub async fn update(
    pool: &PgPool,
    property_id: i64,
    id: i64,
    data: &RoomTypeUpdate,
) -> ServiceResult<Option<RoomType>> {
    sqlx::query_as::<_, RoomType>(
        r#"
        UPDATE room_types SET
            name = COALESCE($3, name),
            description = COALESCE($4, description),
            base_rate = COALESCE($5, base_rate),
            max_occupancy = COALESCE($6, max_occupancy)
        WHERE id = $1 AND property_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(property_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.base_rate)
    .bind(data.max_occupancy)
    .fetch_optional(pool)
    .await
    .map_err(|e| on_conflict(ErrorCode::RoomTypeNameExists)(e.into()))
}

/// Rooms or reservations still point at the type
pub async fn is_in_use(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let (in_use,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (SELECT 1 FROM rooms WHERE room_type_id = $1)
            OR EXISTS (SELECT 1 FROM reservations WHERE room_type_id = $1)
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(in_use)
}

pub async fn delete(pool: &PgPool, property_id: i64, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM room_types WHERE id = $1 AND property_id = $2")
        .bind(id)
        .bind(property_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
