//! Availability and insight DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_type_id: Option<i64>,
}

/// A room with no overlapping active reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FreeRoom {
    pub id: i64,
    pub room_type_id: i64,
    pub number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomTypeAvailability {
    pub room_type_id: i64,
    pub name: String,
    pub base_rate: Decimal,
    pub max_occupancy: i32,
    /// In-service rooms of this type
    pub total_rooms: i64,
    /// Peak number of rooms sold on any night of the range
    pub booked: i64,
    pub available: i64,
    pub free_rooms: Vec<FreeRoom>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub rooms_total: i64,
    pub rooms_booked: i64,
    pub rooms_available: i64,
    pub occupancy_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandForecast {
    pub property_id: i64,
    pub days: Vec<ForecastDay>,
    pub average_occupancy_percent: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingQuery {
    pub room_type_id: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRecommendation {
    pub room_type_id: i64,
    pub date: NaiveDate,
    pub current_rate: Decimal,
    pub recommended_rate: Decimal,
    pub price_change_percent: Decimal,
    pub occupancy_percent: f64,
}
