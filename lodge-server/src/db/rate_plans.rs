//! Rate plan operations

use shared::models::{RatePlan, RatePlanCreate, RatePlanUpdate};
use sqlx::{PgExecutor, PgPool};

use crate::error::ServiceResult;

pub async fn list(pool: &PgPool, property_id: i64) -> ServiceResult<Vec<RatePlan>> {
    let rows = sqlx::query_as::<_, RatePlan>(
        "SELECT * FROM rate_plans WHERE property_id = $1 ORDER BY is_active DESC, name",
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
) -> ServiceResult<Option<RatePlan>> {
    let row = sqlx::query_as::<_, RatePlan>(
        "SELECT * FROM rate_plans WHERE id = $1 AND property_id = $2",
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
    data: &RatePlanCreate,
    now: i64,
) -> ServiceResult<RatePlan> {
    let row = sqlx::query_as::<_, RatePlan>(
        r#"
        INSERT INTO rate_plans (property_id, room_type_id, name, adjustment_percent, min_nights, valid_from, valid_to, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(property_id)
    .bind(data.room_type_id)
    .bind(data.name.trim())
    .bind(data.adjustment_percent)
    .bind(data.min_nights)
    .bind(data.valid_from)
    .bind(data.valid_to)
    .bind(data.is_active)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Partial update. The validity window is re-checked by the table constraint.
pub async fn update(
    pool: &PgPool,
    property_id: i64,
    id: i64,
    data: &RatePlanUpdate,
) -> ServiceResult<Option<RatePlan>> {
    let row = sqlx::query_as::<_, RatePlan>(
        r#"
        UPDATE rate_plans SET
            room_type_id = COALESCE($3, room_type_id),
            name = COALESCE($4, name),
            adjustment_percent = COALESCE($5, adjustment_percent),
            min_nights = COALESCE($6, min_nights),
            valid_from = COALESCE($7, valid_from),
            valid_to = COALESCE($8, valid_to),
            is_active = COALESCE($9, is_active)
        WHERE id = $1 AND property_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(property_id)
    .bind(data.room_type_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.adjustment_percent)
    .bind(data.min_nights)
    .bind(data.valid_from)
    .bind(data.valid_to)
    .bind(data.is_active)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, property_id: i64, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM rate_plans WHERE id = $1 AND property_id = $2")
        .bind(id)
        .bind(property_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
