//! Rate Plan Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Rate plan: a percentage adjustment on the room type base rate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RatePlan {
    pub id: i64,
    pub property_id: i64,
    /// `None` applies to every room type of the property
    pub room_type_id: Option<i64>,
    pub name: String,
    pub adjustment_percent: Decimal,
    pub min_nights: i32,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: i64,
}

/// Why a rate plan cannot be used for a stay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatePlanMismatch {
    Inactive,
    WrongRoomType,
    TooShort,
    OutsideValidity,
}

impl RatePlanMismatch {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Inactive => "Rate plan is not active",
            Self::WrongRoomType => "Rate plan does not apply to this room type",
            Self::TooShort => "Stay is shorter than the rate plan minimum",
            Self::OutsideValidity => "Check-in is outside the rate plan validity",
        }
    }
}

impl RatePlan {
    /// Check that this plan can price the given stay
    ///
    /// Validity is judged on the arrival date.
    pub fn check_applicable(
        &self,
        room_type_id: i64,
        check_in: NaiveDate,
        nights: i64,
    ) -> Result<(), RatePlanMismatch> {
        if !self.is_active {
            return Err(RatePlanMismatch::Inactive);
        }
        if self.room_type_id.is_some_and(|rt| rt != room_type_id) {
            return Err(RatePlanMismatch::WrongRoomType);
        }
        if nights < i64::from(self.min_nights) {
            return Err(RatePlanMismatch::TooShort);
        }
        if self.valid_from.is_some_and(|from| check_in < from)
            || self.valid_to.is_some_and(|to| check_in > to)
        {
            return Err(RatePlanMismatch::OutsideValidity);
        }
        Ok(())
    }
}

fn validity_window(
    valid_from: &Option<NaiveDate>,
    valid_to: &Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if matches!((valid_from, valid_to), (Some(from), Some(to)) if to < from) {
        let mut err = ValidationError::new("validity");
        err.message = Some("valid_to must not be before valid_from".into());
        return Err(err);
    }
    Ok(())
}

fn create_window(plan: &RatePlanCreate) -> Result<(), ValidationError> {
    validity_window(&plan.valid_from, &plan.valid_to)
}

fn update_window(plan: &RatePlanUpdate) -> Result<(), ValidationError> {
    validity_window(&plan.valid_from, &plan.valid_to)
}

/// Create rate plan payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "create_window"))]
pub struct RatePlanCreate {
    pub room_type_id: Option<i64>,
    #[validate(length(min = 1, max = 100, message = "Rate plan name is required"))]
    pub name: String,
    #[validate(custom(function = "super::adjustment_percent_range"))]
    pub adjustment_percent: Decimal,
    #[validate(range(min = 1, max = 365, message = "Minimum nights must be at least 1"))]
    #[serde(default = "default_min_nights")]
    pub min_nights: i32,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_min_nights() -> i32 {
    1
}

fn default_active() -> bool {
    true
}

/// Update rate plan payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "update_window"))]
pub struct RatePlanUpdate {
    pub room_type_id: Option<i64>,
    #[validate(length(min = 1, max = 100, message = "Rate plan name is required"))]
    pub name: Option<String>,
    #[validate(custom(function = "super::adjustment_percent_range"))]
    pub adjustment_percent: Option<Decimal>,
    #[validate(range(min = 1, max = 365, message = "Minimum nights must be at least 1"))]
    pub min_nights: Option<i32>,
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn plan() -> RatePlan {
        RatePlan {
            id: 1,
            property_id: 1,
            room_type_id: Some(7),
            name: "Spring saver".into(),
            adjustment_percent: Decimal::from(-10),
            min_nights: 2,
            valid_from: Some(d(3, 1)),
            valid_to: Some(d(5, 31)),
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn test_applicable() {
        assert_eq!(plan().check_applicable(7, d(4, 10), 3), Ok(()));
        assert_eq!(plan().check_applicable(7, d(5, 31), 2), Ok(()));
    }

    #[test]
    fn test_not_applicable() {
        assert_eq!(
            plan().check_applicable(8, d(4, 10), 3),
            Err(RatePlanMismatch::WrongRoomType)
        );
        assert_eq!(
            plan().check_applicable(7, d(4, 10), 1),
            Err(RatePlanMismatch::TooShort)
        );
        assert_eq!(
            plan().check_applicable(7, d(6, 1), 3),
            Err(RatePlanMismatch::OutsideValidity)
        );
        let inactive = RatePlan {
            is_active: false,
            ..plan()
        };
        assert_eq!(
            inactive.check_applicable(7, d(4, 10), 3),
            Err(RatePlanMismatch::Inactive)
        );
    }

    #[test]
    fn test_property_wide_plan_matches_any_room_type() {
        let wide = RatePlan {
            room_type_id: None,
            valid_from: None,
            valid_to: None,
            ..plan()
        };
        assert!(wide.check_applicable(99, d(12, 24), 2).is_ok());
    }

    #[test]
    fn test_create_validation() {
        let mut payload = RatePlanCreate {
            room_type_id: None,
            name: "Weekly".into(),
            adjustment_percent: Decimal::from(-20),
            min_nights: 7,
            valid_from: Some(d(1, 1)),
            valid_to: Some(d(12, 31)),
            is_active: true,
        };
        assert!(payload.validate().is_ok());

        payload.valid_to = Some(d(1, 1) - chrono::Days::new(1));
        assert!(payload.validate().is_err());

        payload.valid_to = None;
        payload.adjustment_percent = Decimal::from(-120);
        assert!(payload.validate().is_err());
    }
}
