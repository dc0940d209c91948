//! Folio charges and payments

use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::{ChargeKind, Folio, FolioCharge, FolioPayment, PaymentCreate};
use sqlx::{PgExecutor, PgPool};

use crate::error::ServiceResult;

pub async fn load(pool: &PgPool, reservation_id: i64) -> ServiceResult<Folio> {
    let charges = sqlx::query_as::<_, FolioCharge>(
        "SELECT * FROM folio_charges WHERE reservation_id = $1 ORDER BY created_at, id",
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await?;
    let payments = sqlx::query_as::<_, FolioPayment>(
        "SELECT * FROM folio_payments WHERE reservation_id = $1 ORDER BY created_at, id",
    )
    .bind(reservation_id)
    .fetch_all(pool)
    .await?;
    Ok(Folio::new(reservation_id, charges, payments))
}

/// Non-voided charges minus payments
pub async fn balance(conn: impl PgExecutor<'_>, reservation_id: i64) -> ServiceResult<Decimal> {
    let (balance,): (Decimal,) = sqlx::query_as(
        r#"
        SELECT
            COALESCE((SELECT SUM(amount) FROM folio_charges
                      WHERE reservation_id = $1 AND NOT voided), 0)
          - COALESCE((SELECT SUM(amount) FROM folio_payments
                      WHERE reservation_id = $1), 0)
        "#,
    )
    .bind(reservation_id)
    .fetch_one(conn)
    .await?;
    Ok(balance)
}

pub struct NewCharge<'a> {
    pub reservation_id: i64,
    pub kind: ChargeKind,
    pub description: &'a str,
    pub amount: Decimal,
    pub source_order_id: Option<i64>,
    pub created_by: Option<i64>,
}

pub async fn add_charge(
    conn: impl PgExecutor<'_>,
    charge: &NewCharge<'_>,
    now: i64,
) -> ServiceResult<FolioCharge> {
    let row = sqlx::query_as::<_, FolioCharge>(
        r#"
        INSERT INTO folio_charges (reservation_id, kind, description, amount, source_order_id, voided, created_by, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
        RETURNING *
        "#,
    )
    .bind(charge.reservation_id)
    .bind(charge.kind.as_db())
    .bind(charge.description)
    .bind(charge.amount)
    .bind(charge.source_order_id)
    .bind(charge.created_by)
    .bind(now)
    .fetch_one(conn)
    .await?;
    Ok(row)
}

/// Re-price the live room charge after a stay change
pub async fn update_room_charge(
    conn: impl PgExecutor<'_>,
    reservation_id: i64,
    description: &str,
    amount: Decimal,
) -> ServiceResult<()> {
    sqlx::query(
        r#"
        UPDATE folio_charges SET amount = $2, description = $3
        WHERE reservation_id = $1 AND kind = 'room' AND NOT voided
        "#,
    )
    .bind(reservation_id)
    .bind(amount)
    .bind(description)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn void_room_charges(conn: impl PgExecutor<'_>, reservation_id: i64) -> ServiceResult<()> {
    sqlx::query(
        "UPDATE folio_charges SET voided = TRUE WHERE reservation_id = $1 AND kind = 'room' AND NOT voided",
    )
    .bind(reservation_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn void_charge(
    pool: &PgPool,
    reservation_id: i64,
    charge_id: i64,
) -> ServiceResult<FolioCharge> {
    let mut tx = pool.begin().await?;

    let charge = sqlx::query_as::<_, FolioCharge>(
        "SELECT * FROM folio_charges WHERE id = $1 AND reservation_id = $2 FOR UPDATE",
    )
    .bind(charge_id)
    .bind(reservation_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ErrorCode::ChargeNotFound)?;

    if charge.voided {
        return Err(ErrorCode::ChargeAlreadyVoided.into());
    }

    let charge = sqlx::query_as::<_, FolioCharge>(
        "UPDATE folio_charges SET voided = TRUE WHERE id = $1 RETURNING *",
    )
    .bind(charge.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(charge)
}

pub async fn add_payment(
    pool: &PgPool,
    reservation_id: i64,
    data: &PaymentCreate,
    created_by: i64,
    now: i64,
) -> ServiceResult<FolioPayment> {
    let row = sqlx::query_as::<_, FolioPayment>(
        r#"
        INSERT INTO folio_payments (reservation_id, amount, method, reference, created_by, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(reservation_id)
    .bind(data.amount)
    .bind(data.method.as_db())
    .bind(&data.reference)
    .bind(created_by)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}
