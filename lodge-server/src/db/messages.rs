//! Guest messages

use shared::models::{GuestMessage, MessageCreate, MessageDirection};
use sqlx::PgPool;

use crate::error::ServiceResult;

pub async fn list(pool: &PgPool, reservation_id: i64) -> ServiceResult<Vec<GuestMessage>> {
    let rows = sqlx::query_as::<_, GuestMessage>(
        "SELECT * FROM guest_messages WHERE reservation_id = $1 ORDER BY created_at, id",
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Outbound messages record the sending staff member
pub async fn create(
    pool: &PgPool,
    reservation_id: i64,
    data: &MessageCreate,
    user_id: i64,
    now: i64,
) -> ServiceResult<GuestMessage> {
    let sender = (data.direction == MessageDirection::Outbound).then_some(user_id);
    // staff wrote it, so it starts read
    let read_at = (data.direction == MessageDirection::Outbound).then_some(now);
    let row = sqlx::query_as::<_, GuestMessage>(
        r#"
        INSERT INTO guest_messages (reservation_id, direction, body, sender_user_id, read_at, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(reservation_id)
    .bind(data.direction.as_db())
    .bind(data.body.trim())
    .bind(sender)
    .bind(read_at)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// First read wins; marking again keeps the original time
pub async fn mark_read(
    pool: &PgPool,
    reservation_id: i64,
    id: i64,
    now: i64,
) -> ServiceResult<Option<GuestMessage>> {
    let row = sqlx::query_as::<_, GuestMessage>(
        r#"
        UPDATE guest_messages SET read_at = COALESCE(read_at, $3)
        WHERE id = $1 AND reservation_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(reservation_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
