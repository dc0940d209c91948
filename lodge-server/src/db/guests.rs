//! Guest operations (account scoped)

use shared::models::{Guest, GuestCreate, GuestUpdate, Reservation};
use shared::request::ListQuery;
use sqlx::{PgExecutor, PgPool};

use super::like_pattern;
use crate::error::ServiceResult;

/// Search by name, email or phone; newest first
pub async fn list(
    pool: &PgPool,
    account_id: i64,
    query: &ListQuery,
) -> ServiceResult<(Vec<Guest>, i64)> {
    let pattern = query.keyword().map(like_pattern);
    let page = query.pagination();

    let filter = r#"
        WHERE account_id = $1
          AND ($2::text IS NULL
               OR first_name || ' ' || last_name ILIKE $2
               OR email ILIKE $2
               OR phone ILIKE $2)
    "#;

    let rows = sqlx::query_as::<_, Guest>(&format!(
        "SELECT * FROM guests {filter} ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4"
    ))
    .bind(account_id)
    .bind(&pattern)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM guests {filter}"))
        .bind(account_id)
        .bind(&pattern)
        .fetch_one(pool)
        .await?;

    Ok((rows, total))
}

pub async fn find(
    conn: impl PgExecutor<'_>,
    account_id: i64,
    id: i64,
) -> ServiceResult<Option<Guest>> {
    let row = sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = $1 AND account_id = $2")
        .bind(id)
        .bind(account_id)
        .fetch_optional(conn)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &PgPool,
    account_id: i64,
    data: &GuestCreate,
    now: i64,
) -> ServiceResult<Guest> {
    let row = sqlx::query_as::<_, Guest>(
        r#"
        INSERT INTO guests (account_id, first_name, last_name, email, phone, nationality, document_number, notes, is_vip, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(data.first_name.trim())
    .bind(data.last_name.trim())
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.nationality)
    .bind(&data.document_number)
    .bind(&data.notes)
    .bind(data.is_vip)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    account_id: i64,
    id: i64,
    data: &GuestUpdate,
) -> ServiceResult<Option<Guest>> {
    let row = sqlx::query_as::<_, Guest>(
        r#"
        UPDATE guests SET
            first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name),
            email = COALESCE($5, email),
            phone = COALESCE($6, phone),
            nationality = COALESCE($7, nationality),
            document_number = COALESCE($8, document_number),
            notes = COALESCE($9, notes),
            is_vip = COALESCE($10, is_vip)
        WHERE id = $1 AND account_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(account_id)
    .bind(data.first_name.as_deref().map(str::trim))
    .bind(data.last_name.as_deref().map(str::trim))
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.nationality)
    .bind(&data.document_number)
    .bind(&data.notes)
    .bind(data.is_vip)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn has_reservations(pool: &PgPool, id: i64) -> ServiceResult<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM reservations WHERE guest_id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn delete(pool: &PgPool, account_id: i64, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM guests WHERE id = $1 AND account_id = $2")
        .bind(id)
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Stay history across the account's properties, latest arrival first
pub async fn stay_history(
    pool: &PgPool,
    account_id: i64,
    guest_id: i64,
) -> ServiceResult<Vec<Reservation>> {
    let rows = sqlx::query_as::<_, Reservation>(
        r#"
        SELECT r.* FROM reservations r
        JOIN properties p ON p.id = r.property_id
        WHERE r.guest_id = $1 AND p.account_id = $2
        ORDER BY r.check_in DESC, r.id DESC
        "#,
    )
    .bind(guest_id)
    .bind(account_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
