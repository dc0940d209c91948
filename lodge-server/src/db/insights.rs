//! Inputs for guest churn and payment screening

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::ServiceResult;

/// One guest's bookings across every property of the account
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct GuestHistory {
    pub completed_stays: i64,
    /// Cancelled or no-show
    pub lost_bookings: i64,
    pub total_bookings: i64,
    /// Confirmed or in house
    pub upcoming_stays: i64,
    pub last_stay: Option<NaiveDate>,
    pub lifetime_value: Decimal,
}

pub async fn guest_history(
    pool: &PgPool,
    account_id: i64,
    guest_id: i64,
) -> ServiceResult<GuestHistory> {
    let row = sqlx::query_as::<_, GuestHistory>(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE r.status = 'checked_out') AS completed_stays,
            COUNT(*) FILTER (WHERE r.status IN ('cancelled', 'no_show')) AS lost_bookings,
            COUNT(*) AS total_bookings,
            COUNT(*) FILTER (WHERE r.status IN ('confirmed', 'checked_in')) AS upcoming_stays,
            MAX(r.check_out) FILTER (WHERE r.status = 'checked_out') AS last_stay,
            COALESCE(SUM(r.total_amount) FILTER (WHERE r.status = 'checked_out'), 0) AS lifetime_value
        FROM reservations r
        JOIN properties p ON p.id = r.property_id
        WHERE r.guest_id = $1 AND p.account_id = $2
        "#,
    )
    .bind(guest_id)
    .bind(account_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// A payment and the context it is judged against
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaymentSignals {
    pub payment_id: i64,
    pub reservation_id: i64,
    pub amount: Decimal,
    pub created_at: i64,
    /// Mean of the guest's other payments
    pub guest_average: Option<Decimal>,
    /// Guest's payments in the 24 hours up to this one, itself included
    pub recent_payments: i64,
    /// Folio balance; negative when overpaid
    pub balance: Decimal,
}

pub async fn payment_signals(
    pool: &PgPool,
    property_id: i64,
    payment_id: i64,
) -> ServiceResult<Option<PaymentSignals>> {
    let row = sqlx::query_as::<_, PaymentSignals>(
        r#"
        SELECT
            p.id AS payment_id,
            p.reservation_id,
            p.amount,
            p.created_at,
            (SELECT AVG(op.amount) FROM folio_payments op
             JOIN reservations ores ON ores.id = op.reservation_id
             WHERE ores.guest_id = r.guest_id AND op.id <> p.id) AS guest_average,
            (SELECT COUNT(*) FROM folio_payments vp
             JOIN reservations vres ON vres.id = vp.reservation_id
             WHERE vres.guest_id = r.guest_id
               AND vp.created_at > p.created_at - 86400000
               AND vp.created_at <= p.created_at) AS recent_payments,
            COALESCE((SELECT SUM(amount) FROM folio_charges
                      WHERE reservation_id = p.reservation_id AND NOT voided), 0)
          - COALESCE((SELECT SUM(amount) FROM folio_payments
                      WHERE reservation_id = p.reservation_id), 0) AS balance
        FROM folio_payments p
        JOIN reservations r ON r.id = p.reservation_id
        WHERE p.id = $2 AND r.property_id = $1
        "#,
    )
    .bind(property_id)
    .bind(payment_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
