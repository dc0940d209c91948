//! Dashboard statistics

use super::license::LicenseInfo;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    /// Defaults to today (UTC)
    pub date: Option<NaiveDate>,
}

/// Per-property figures for one business date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDashboard {
    pub property_id: i64,
    pub date: NaiveDate,
    pub total_rooms: i64,
    pub out_of_service: i64,
    pub occupied: i64,
    pub available: i64,
    /// Percent of in-service rooms occupied, 2 dp
    pub occupancy_rate: f64,
    pub arrivals: i64,
    pub departures: i64,
    pub in_house_guests: i64,
    pub pending_orders: i64,
    pub open_requests: i64,
    pub unread_messages: i64,
    pub month_revenue: Decimal,
    pub adr: Decimal,
}

/// Account-wide summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountDashboard {
    pub properties: i64,
    pub rooms: i64,
    /// Arrivals in the next 7 days
    pub upcoming_arrivals: i64,
    pub in_house: i64,
    pub license: LicenseInfo,
}

/// `part / whole` as a percentage rounded to 2 dp; 0 when `whole` is 0
pub fn percent(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 10_000.0).round() / 100.0
}

/// Average daily rate: room revenue per occupied room-night
pub fn average_daily_rate(room_revenue: Decimal, room_nights: i64) -> Decimal {
    if room_nights <= 0 {
        return Decimal::ZERO;
    }
    (room_revenue / Decimal::from(room_nights))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(15, 20), 75.0);
        assert_eq!(percent(1, 3), 33.33);
        assert_eq!(percent(2, 3), 66.67);
        assert_eq!(percent(5, 0), 0.0);
    }

    #[test]
    fn test_adr() {
        assert_eq!(
            average_daily_rate(Decimal::new(100000, 2), 8),
            Decimal::new(12500, 2)
        );
        assert_eq!(
            average_daily_rate(Decimal::from(100), 3),
            "33.33".parse::<Decimal>().unwrap()
        );
        assert_eq!(average_daily_rate(Decimal::from(500), 0), Decimal::ZERO);
    }
}
