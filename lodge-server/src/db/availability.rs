//! Availability and occupancy queries
//!
//! A reservation holds inventory for the nights `[check_in, check_out)`
//! while confirmed or checked in. Room-type capacity is judged per night:
//! a type is sold out for a range when any night of it already has as many
//! active reservations as in-service rooms.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::FreeRoom;
use sqlx::{PgExecutor, PgPool};

use crate::error::ServiceResult;

/// Per room type load over a date range
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoomTypeLoad {
    pub room_type_id: i64,
    pub name: String,
    pub base_rate: Decimal,
    pub max_occupancy: i32,
    pub total_rooms: i64,
    pub booked: i64,
}

pub async fn room_type_loads(
    pool: &PgPool,
    property_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    room_type_id: Option<i64>,
) -> ServiceResult<Vec<RoomTypeLoad>> {
    let rows = sqlx::query_as::<_, RoomTypeLoad>(
        r#"
        SELECT
            rt.id AS room_type_id,
            rt.name,
            rt.base_rate,
            rt.max_occupancy,
            (SELECT COUNT(*) FROM rooms r
             WHERE r.room_type_id = rt.id AND r.status <> 'out_of_service') AS total_rooms,
            COALESCE((
                SELECT MAX(per_night.cnt) FROM (
                    SELECT COUNT(res.id) AS cnt
                    FROM generate_series($2::date, $3::date - 1, interval '1 day') AS d(night)
                    LEFT JOIN reservations res
                        ON res.room_type_id = rt.id
                       AND res.status IN ('confirmed', 'checked_in')
                       AND res.check_in <= d.night::date
                       AND res.check_out > d.night::date
                    GROUP BY d.night
                ) per_night
            ), 0) AS booked
        FROM room_types rt
        WHERE rt.property_id = $1 AND ($4::bigint IS NULL OR rt.id = $4)
        ORDER BY rt.name
        "#,
    )
    .bind(property_id)
    .bind(check_in)
    .bind(check_out)
    .bind(room_type_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// In-service rooms with no overlapping active reservation
pub async fn free_rooms(
    pool: &PgPool,
    property_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    room_type_id: Option<i64>,
) -> ServiceResult<Vec<FreeRoom>> {
    let rows = sqlx::query_as::<_, FreeRoom>(
        r#"
        SELECT r.id, r.room_type_id, r.number
        FROM rooms r
        WHERE r.property_id = $1
          AND r.status <> 'out_of_service'
          AND ($4::bigint IS NULL OR r.room_type_id = $4)
          AND NOT EXISTS (
              SELECT 1 FROM reservations res
              WHERE res.room_id = r.id
                AND res.status IN ('confirmed', 'checked_in')
                AND res.check_in < $3
                AND res.check_out > $2
          )
        ORDER BY r.number
        "#,
    )
    .bind(property_id)
    .bind(check_in)
    .bind(check_out)
    .bind(room_type_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// No other active reservation holds `room_id` on any night of the range
pub async fn room_is_free(
    conn: impl PgExecutor<'_>,
    room_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_reservation: Option<i64>,
) -> ServiceResult<bool> {
    let (taken,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM reservations
            WHERE room_id = $1
              AND status IN ('confirmed', 'checked_in')
              AND check_in < $3
              AND check_out > $2
              AND ($4::bigint IS NULL OR id <> $4)
        )
        "#,
    )
    .bind(room_id)
    .bind(check_in)
    .bind(check_out)
    .bind(exclude_reservation)
    .fetch_one(conn)
    .await?;
    Ok(!taken)
}

/// Highest number of active reservations of the type on any night of the range
pub async fn peak_booked(
    conn: impl PgExecutor<'_>,
    room_type_id: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_reservation: Option<i64>,
) -> ServiceResult<i64> {
    let (peak,): (i64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(MAX(cnt), 0) FROM (
            SELECT COUNT(res.id) AS cnt
            FROM generate_series($2::date, $3::date - 1, interval '1 day') AS d(night)
            LEFT JOIN reservations res
                ON res.room_type_id = $1
               AND res.status IN ('confirmed', 'checked_in')
               AND res.check_in <= d.night::date
               AND res.check_out > d.night::date
               AND ($4::bigint IS NULL OR res.id <> $4)
            GROUP BY d.night
        ) per_night
        "#,
    )
    .bind(room_type_id)
    .bind(check_in)
    .bind(check_out)
    .bind(exclude_reservation)
    .fetch_one(conn)
    .await?;
    Ok(peak)
}

/// Some night from `from` on has more active reservations of the type than
/// its in-service rooms other than `room_id`
pub async fn overbooked_without(
    conn: impl PgExecutor<'_>,
    room_type_id: i64,
    room_id: i64,
    from: NaiveDate,
) -> ServiceResult<bool> {
    let (overbooked,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM generate_series(
                $3::date,
                (SELECT MAX(check_out) FROM reservations
                 WHERE room_type_id = $1 AND status IN ('confirmed', 'checked_in')) - 1,
                interval '1 day'
            ) AS d(night)
            WHERE (
                SELECT COUNT(*) FROM reservations res
                WHERE res.room_type_id = $1
                  AND res.status IN ('confirmed', 'checked_in')
                  AND res.check_in <= d.night::date
                  AND res.check_out > d.night::date
            ) > (
                SELECT COUNT(*) FROM rooms
                WHERE room_type_id = $1 AND id <> $2 AND status <> 'out_of_service'
            )
        )
        "#,
    )
    .bind(room_type_id)
    .bind(room_id)
    .bind(from)
    .fetch_one(conn)
    .await?;
    Ok(overbooked)
}

/// In-service rooms of a type
pub async fn sellable_rooms(conn: impl PgExecutor<'_>, room_type_id: i64) -> ServiceResult<i64> {
    let (n,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM rooms WHERE room_type_id = $1 AND status <> 'out_of_service'",
    )
    .bind(room_type_id)
    .fetch_one(conn)
    .await?;
    Ok(n)
}

/// In-service rooms of the property, optionally one type
pub async fn sellable_rooms_in_property(
    pool: &PgPool,
    property_id: i64,
    room_type_id: Option<i64>,
) -> ServiceResult<i64> {
    let (n,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM rooms
        WHERE property_id = $1
          AND status <> 'out_of_service'
          AND ($2::bigint IS NULL OR room_type_id = $2)
        "#,
    )
    .bind(property_id)
    .bind(room_type_id)
    .fetch_one(pool)
    .await?;
    Ok(n)
}

/// Active reservations per night for `days` nights starting at `from`
pub async fn nightly_bookings(
    pool: &PgPool,
    property_id: i64,
    from: NaiveDate,
    days: i32,
    room_type_id: Option<i64>,
) -> ServiceResult<Vec<(NaiveDate, i64)>> {
    let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
        r#"
        SELECT d.night::date AS night, COUNT(res.id) AS booked
        FROM generate_series($2::date, $2::date + ($3::int - 1), interval '1 day') AS d(night)
        LEFT JOIN reservations res
            ON res.property_id = $1
           AND res.status IN ('confirmed', 'checked_in')
           AND res.check_in <= d.night::date
           AND res.check_out > d.night::date
           AND ($4::bigint IS NULL OR res.room_type_id = $4)
        GROUP BY d.night
        ORDER BY d.night
        "#,
    )
    .bind(property_id)
    .bind(from)
    .bind(days)
    .bind(room_type_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
