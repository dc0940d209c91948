//! Dashboard API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use shared::models::{
    AccountDashboard, DashboardQuery, PropertyDashboard, average_daily_rate, percent,
};
use shared::util::{now_millis, today};

use crate::api::{ApiResult, verify_property};
use crate::auth::CurrentUser;
use crate::db;
use crate::db::dashboard::{MonthRevenue, PropertyCounts};
use crate::license::LicenseSnapshot;
use crate::state::AppState;

/// GET /api/properties/{property_id}/dashboard?date=
pub async fn property(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(property_id): Path<i64>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<PropertyDashboard> {
    verify_property(&state, &current, property_id).await?;
    let date = query.date.unwrap_or_else(today);

    let counts = db::dashboard::property_counts(&state.pool, property_id, date).await?;
    let revenue = db::dashboard::month_revenue(&state.pool, property_id, date).await?;
    Ok(Json(assemble(property_id, date, counts, revenue)))
}

fn assemble(
    property_id: i64,
    date: chrono::NaiveDate,
    counts: PropertyCounts,
    revenue: MonthRevenue,
) -> PropertyDashboard {
    let in_service = counts.total_rooms - counts.out_of_service;
    PropertyDashboard {
        property_id,
        date,
        total_rooms: counts.total_rooms,
        out_of_service: counts.out_of_service,
        occupied: counts.occupied,
        available: (in_service - counts.occupied).max(0),
        occupancy_rate: percent(counts.occupied, in_service),
        arrivals: counts.arrivals,
        departures: counts.departures,
        in_house_guests: counts.in_house_guests,
        pending_orders: counts.pending_orders,
        open_requests: counts.open_requests,
        unread_messages: counts.unread_messages,
        month_revenue: revenue.revenue,
        adr: average_daily_rate(revenue.room_revenue, revenue.room_nights),
    }
}

/// GET /api/dashboard
pub async fn account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Extension(license): Extension<LicenseSnapshot>,
) -> ApiResult<AccountDashboard> {
    let counts = db::dashboard::account_counts(&state.pool, current.account_id, today()).await?;
    Ok(Json(AccountDashboard {
        properties: counts.properties,
        rooms: counts.rooms,
        upcoming_arrivals: counts.upcoming_arrivals,
        in_house: counts.in_house,
        license: license.info(now_millis(), counts.properties, counts.rooms),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn counts(total: i64, out_of_service: i64, occupied: i64) -> PropertyCounts {
        PropertyCounts {
            total_rooms: total,
            out_of_service,
            occupied,
            arrivals: 2,
            departures: 1,
            in_house_guests: occupied * 2,
            pending_orders: 0,
            open_requests: 3,
            unread_messages: 1,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()
    }

    #[test]
    fn test_occupancy_over_in_service_rooms() {
        let revenue = MonthRevenue {
            revenue: Decimal::new(150000, 2),
            room_revenue: Decimal::new(120000, 2),
            room_nights: 9,
        };
        let dash = assemble(1, date(), counts(10, 2, 6), revenue);
        assert_eq!(dash.available, 2);
        assert_eq!(dash.occupancy_rate, 75.0);
        assert_eq!(dash.month_revenue, Decimal::new(150000, 2));
        assert_eq!(dash.adr, Decimal::new(13333, 2));
    }

    #[test]
    fn test_empty_property() {
        let revenue = MonthRevenue {
            revenue: Decimal::ZERO,
            room_revenue: Decimal::ZERO,
            room_nights: 0,
        };
        let dash = assemble(1, date(), counts(0, 0, 0), revenue);
        assert_eq!(dash.occupancy_rate, 0.0);
        assert_eq!(dash.available, 0);
        assert_eq!(dash.adr, Decimal::ZERO);
    }
}
