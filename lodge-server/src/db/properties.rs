//! Property operations (account scoped)

use shared::error::AppError;
use shared::models::{Property, PropertyCreate, PropertyUpdate};
use sqlx::{PgExecutor, PgPool};

use super::{ACTIVE_STATUSES, licenses};
use crate::error::ServiceResult;

pub async fn list(pool: &PgPool, account_id: i64) -> ServiceResult<Vec<Property>> {
    let rows = sqlx::query_as::<_, Property>(
        "SELECT * FROM properties WHERE account_id = $1 ORDER BY name, id",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, account_id: i64, id: i64) -> ServiceResult<Option<Property>> {
    let row = sqlx::query_as::<_, Property>(
        "SELECT * FROM properties WHERE id = $1 AND account_id = $2",
    )
    .bind(id)
    .bind(account_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn count(conn: impl PgExecutor<'_>, account_id: i64) -> ServiceResult<i64> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties WHERE account_id = $1")
        .bind(account_id)
        .fetch_one(conn)
        .await?;
    Ok(n)
}

/// Insert a property if `quota` admits one more over the current count
pub async fn create(
    pool: &PgPool,
    account_id: i64,
    data: &PropertyCreate,
    quota: impl FnOnce(i64) -> Result<(), AppError>,
    now: i64,
) -> ServiceResult<Property> {
    let mut tx = pool.begin().await?;
    licenses::lock(&mut *tx, account_id).await?;
    quota(count(&mut *tx, account_id).await?)?;

    let row = sqlx::query_as::<_, Property>(
        r#"
        INSERT INTO properties (account_id, name, address, city, country, phone, email, timezone, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'UTC'), $9, $9)
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(data.name.trim())
    .bind(&data.address)
    .bind(&data.city)
    .bind(&data.country)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.timezone)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    account_id: i64,
    id: i64,
    data: &PropertyUpdate,
    now: i64,
) -> ServiceResult<Option<Property>> {
    let row = sqlx::query_as::<_, Property>(
        r#"
        UPDATE properties SET
            name = COALESCE($3, name),
            address = COALESCE($4, address),
            city = COALESCE($5, city),
            country = COALESCE($6, country),
            phone = COALESCE($7, phone),
            email = COALESCE($8, email),
            timezone = COALESCE($9, timezone),
            updated_at = $10
        WHERE id = $1 AND account_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(account_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.address)
    .bind(&data.city)
    .bind(&data.country)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.timezone)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn has_active_reservations(pool: &PgPool, property_id: i64) -> ServiceResult<bool> {
    let (exists,): (bool,) = sqlx::query_as(&format!(
        "SELECT EXISTS (SELECT 1 FROM reservations WHERE property_id = $1 AND status IN {ACTIVE_STATUSES})"
    ))
    .bind(property_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

/// Deletes the property with its rooms, rates and closed reservations
pub async fn delete(pool: &PgPool, account_id: i64, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM properties WHERE id = $1 AND account_id = $2")
        .bind(id)
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
