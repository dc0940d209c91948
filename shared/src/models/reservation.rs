//! Reservation Model

use super::guest::Guest;
use crate::request::{PaginationQuery, default_page, default_per_page};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// Parse from database string value
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(Self::Confirmed),
            "checked_in" => Some(Self::CheckedIn),
            "checked_out" => Some(Self::CheckedOut),
            "cancelled" => Some(Self::Cancelled),
            "no_show" => Some(Self::NoShow),
            _ => None,
        }
    }

    /// Database string representation
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Holds inventory: counts against availability
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        matches!(
            (self, next),
            (
                Self::Confirmed,
                Self::CheckedIn | Self::Cancelled | Self::NoShow
            ) | (Self::CheckedIn, Self::CheckedOut)
        )
    }
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    pub property_id: i64,
    pub guest_id: i64,
    pub room_type_id: i64,
    pub room_id: Option<i64>,
    pub rate_plan_id: Option<i64>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: i32,
    pub children: i32,
    pub status: String,
    pub nightly_rate: Decimal,
    pub nights: i32,
    pub total_amount: Decimal,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    pub fn status(&self) -> Option<ReservationStatus> {
        ReservationStatus::from_db(&self.status)
    }
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReservationCreate {
    pub guest_id: i64,
    pub room_type_id: i64,
    pub room_id: Option<i64>,
    pub rate_plan_id: Option<i64>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, max = 20, message = "At least one adult is required"))]
    pub adults: i32,
    #[serde(default)]
    #[validate(range(min = 0, max = 20, message = "Children must be between 0 and 20"))]
    pub children: i32,
    /// Manual nightly rate, wins over rate plan and base rate
    #[validate(custom(function = "super::non_negative_amount"))]
    pub nightly_rate: Option<Decimal>,
    #[validate(length(max = 50, message = "Source is too long"))]
    pub source: Option<String>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Update reservation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReservationUpdate {
    pub room_type_id: Option<i64>,
    pub room_id: Option<i64>,
    pub rate_plan_id: Option<i64>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[validate(range(min = 1, max = 20, message = "At least one adult is required"))]
    pub adults: Option<i32>,
    #[validate(range(min = 0, max = 20, message = "Children must be between 0 and 20"))]
    pub children: Option<i32>,
    #[validate(custom(function = "super::non_negative_amount"))]
    pub nightly_rate: Option<Decimal>,
    #[validate(length(max = 50, message = "Source is too long"))]
    pub source: Option<String>,
    #[validate(length(max = 2000, message = "Notes are too long"))]
    pub notes: Option<String>,
}

/// Reservation list filters
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationQuery {
    pub status: Option<ReservationStatus>,
    /// Stays overlapping `[from, to)`
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub guest_id: Option<i64>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl ReservationQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.per_page)
    }
}

/// Check-in payload (room can be assigned at the desk)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CheckInRequest {
    pub room_id: Option<i64>,
}

/// Reservation with guest, room and folio balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDetail {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub guest: Guest,
    pub room_type_name: String,
    pub room_number: Option<String>,
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_status_db_roundtrip() {
        for status in [Confirmed, CheckedIn, CheckedOut, Cancelled, NoShow] {
            assert_eq!(ReservationStatus::from_db(status.as_db()), Some(status));
        }
        assert_eq!(ReservationStatus::from_db("pending"), None);
    }

    #[test]
    fn test_status_transitions() {
        assert!(Confirmed.can_transition_to(CheckedIn));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(CheckedIn.can_transition_to(CheckedOut));

        assert!(!Confirmed.can_transition_to(CheckedOut));
        assert!(!CheckedIn.can_transition_to(Cancelled));
        assert!(!CheckedOut.can_transition_to(CheckedIn));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!NoShow.can_transition_to(CheckedIn));
    }

    #[test]
    fn test_active_statuses() {
        assert!(Confirmed.is_active());
        assert!(CheckedIn.is_active());
        assert!(CheckedOut.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(NoShow.is_terminal());
    }

    #[test]
    fn test_create_requires_an_adult() {
        let payload: ReservationCreate = serde_json::from_value(serde_json::json!({
            "guest_id": 1,
            "room_type_id": 2,
            "check_in": "2026-05-01",
            "check_out": "2026-05-03",
            "adults": 0
        }))
        .unwrap();
        assert_eq!(payload.children, 0);
        assert!(payload.validate().is_err());

        let ok = ReservationCreate {
            adults: 2,
            ..payload
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_negative_rate_override() {
        let payload: ReservationCreate = serde_json::from_value(serde_json::json!({
            "guest_id": 1,
            "room_type_id": 2,
            "check_in": "2026-05-01",
            "check_out": "2026-05-03",
            "adults": 1,
            "nightly_rate": "-10.00"
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_create_rejects_rate_beyond_money_column() {
        let payload: ReservationCreate = serde_json::from_value(serde_json::json!({
            "guest_id": 1,
            "room_type_id": 2,
            "check_in": "2026-05-01",
            "check_out": "2026-05-03",
            "adults": 1,
            "nightly_rate": 5e28
        }))
        .unwrap();
        let err = crate::AppError::from(payload.validate().unwrap_err());
        assert_eq!(err.message, "Amount must not exceed 9999999999.99");
    }

    #[test]
    fn test_query_status_parses_snake_case() {
        let q: ReservationQuery =
            serde_json::from_value(serde_json::json!({ "status": "checked_in" })).unwrap();
        assert_eq!(q.status, Some(CheckedIn));
        assert_eq!(q.pagination().limit(), 20);
    }
}
