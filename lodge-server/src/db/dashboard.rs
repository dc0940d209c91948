//! Dashboard aggregates
//!
//! Counts come from joins over rooms, reservations, orders, requests,
//! messages and folio charges for one property and business date.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use shared::util::date_start_millis;
use sqlx::PgPool;

use crate::error::ServiceResult;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PropertyCounts {
    pub total_rooms: i64,
    pub out_of_service: i64,
    pub occupied: i64,
    pub arrivals: i64,
    pub departures: i64,
    pub in_house_guests: i64,
    pub pending_orders: i64,
    pub open_requests: i64,
    pub unread_messages: i64,
}

pub async fn property_counts(
    pool: &PgPool,
    property_id: i64,
    date: NaiveDate,
) -> ServiceResult<PropertyCounts> {
    let counts = sqlx::query_as::<_, PropertyCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM rooms WHERE property_id = $1) AS total_rooms,
            (SELECT COUNT(*) FROM rooms
             WHERE property_id = $1 AND status = 'out_of_service') AS out_of_service,
            (SELECT COUNT(DISTINCT res.room_id) FROM reservations res
             JOIN rooms r ON r.id = res.room_id
             WHERE res.property_id = $1 AND res.status = 'checked_in'
               AND res.check_in <= $2 AND res.check_out > $2) AS occupied,
            (SELECT COUNT(*) FROM reservations
             WHERE property_id = $1 AND check_in = $2
               AND status NOT IN ('cancelled', 'no_show')) AS arrivals,
            (SELECT COUNT(*) FROM reservations
             WHERE property_id = $1 AND check_out = $2
               AND status NOT IN ('cancelled', 'no_show')) AS departures,
            (SELECT COALESCE(SUM(adults + children), 0)::bigint FROM reservations
             WHERE property_id = $1 AND status = 'checked_in'
               AND check_in <= $2 AND check_out > $2) AS in_house_guests,
            (SELECT COUNT(*) FROM guest_orders o
             JOIN reservations res ON res.id = o.reservation_id
             WHERE res.property_id = $1 AND o.status IN ('pending', 'preparing')) AS pending_orders,
            (SELECT COUNT(*) FROM service_requests sr
             JOIN reservations res ON res.id = sr.reservation_id
             WHERE res.property_id = $1 AND sr.status IN ('open', 'in_progress')) AS open_requests,
            (SELECT COUNT(*) FROM guest_messages m
             JOIN reservations res ON res.id = m.reservation_id
             WHERE res.property_id = $1 AND m.direction = 'inbound'
               AND m.read_at IS NULL) AS unread_messages
        "#,
    )
    .bind(property_id)
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

/// First day of the month containing `date` and of the next month
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date.with_day(1).unwrap_or(date);
    let end = start.checked_add_months(Months::new(1)).unwrap_or(start);
    (start, end)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthRevenue {
    /// Non-voided charges posted during the month
    pub revenue: Decimal,
    /// Nightly rate × nights falling in the month, stays that checked in
    pub room_revenue: Decimal,
    pub room_nights: i64,
}

pub async fn month_revenue(
    pool: &PgPool,
    property_id: i64,
    date: NaiveDate,
) -> ServiceResult<MonthRevenue> {
    let (start, end) = month_bounds(date);
    let row = sqlx::query_as::<_, MonthRevenue>(
        r#"
        SELECT
            (SELECT COALESCE(SUM(fc.amount), 0) FROM folio_charges fc
             JOIN reservations res ON res.id = fc.reservation_id
             WHERE res.property_id = $1 AND NOT fc.voided
               AND fc.created_at >= $4 AND fc.created_at < $5) AS revenue,
            COALESCE(SUM(stay.nights_in_month * stay.nightly_rate), 0) AS room_revenue,
            COALESCE(SUM(stay.nights_in_month), 0)::bigint AS room_nights
        FROM (
            SELECT res.nightly_rate,
                   LEAST(res.check_out, $3) - GREATEST(res.check_in, $2) AS nights_in_month
            FROM reservations res
            WHERE res.property_id = $1
              AND res.status IN ('checked_in', 'checked_out')
              AND res.check_in < $3 AND res.check_out > $2
        ) stay
        "#,
    )
    .bind(property_id)
    .bind(start)
    .bind(end)
    .bind(date_start_millis(start))
    .bind(date_start_millis(end))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountCounts {
    pub properties: i64,
    pub rooms: i64,
    pub upcoming_arrivals: i64,
    pub in_house: i64,
}

/// Account totals; upcoming arrivals cover `[today, today + 7)`
pub async fn account_counts(
    pool: &PgPool,
    account_id: i64,
    today: NaiveDate,
) -> ServiceResult<AccountCounts> {
    let counts = sqlx::query_as::<_, AccountCounts>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM properties WHERE account_id = $1) AS properties,
            (SELECT COUNT(*) FROM rooms r
             JOIN properties p ON p.id = r.property_id
             WHERE p.account_id = $1) AS rooms,
            (SELECT COUNT(*) FROM reservations res
             JOIN properties p ON p.id = res.property_id
             WHERE p.account_id = $1 AND res.status = 'confirmed'
               AND res.check_in >= $2 AND res.check_in < $2 + 7) AS upcoming_arrivals,
            (SELECT COUNT(*) FROM reservations res
             JOIN properties p ON p.id = res.property_id
             WHERE p.account_id = $1 AND res.status = 'checked_in') AS in_house
        "#,
    )
    .bind(account_id)
    .bind(today)
    .fetch_one(pool)
    .await?;
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(month_bounds(d(2026, 3, 14)), (d(2026, 3, 1), d(2026, 4, 1)));
        assert_eq!(month_bounds(d(2026, 12, 31)), (d(2026, 12, 1), d(2027, 1, 1)));
    }
}
