//! Data models
//!
//! Shared between lodge-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL), money is `Decimal`
//! (NUMERIC(12,2)), timestamps are Unix milliseconds.

pub mod audit;
pub mod availability;
pub mod dashboard;
pub mod folio;
pub mod guest;
pub mod insights;
pub mod license;
pub mod message;
pub mod property;
pub mod rate_plan;
pub mod reservation;
pub mod room;
pub mod room_service;
pub mod room_type;
pub mod stay;
pub mod user;

// Re-exports
pub use audit::*;
pub use availability::*;
pub use dashboard::*;
pub use folio::*;
pub use guest::*;
pub use insights::*;
pub use license::*;
pub use message::*;
pub use property::*;
pub use rate_plan::*;
pub use reservation::*;
pub use room::*;
pub use room_service::*;
pub use room_type::*;
pub use stay::*;
pub use user::*;

use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::ValidationError;

/// Largest magnitude a `NUMERIC(12,2)` column holds (9 999 999 999.99)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

fn money_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn within_max(value: &Decimal) -> Result<(), ValidationError> {
    if value.abs() > MAX_AMOUNT {
        return Err(money_error("max", "Amount must not exceed 9999999999.99"));
    }
    Ok(())
}

/// `Some(amount)` when it fits a money column
pub fn bounded_amount(amount: Decimal) -> Option<Decimal> {
    (amount.abs() <= MAX_AMOUNT).then_some(amount)
}

pub(crate) fn non_negative_amount(value: &Decimal) -> Result<(), ValidationError> {
    within_max(value)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(money_error("non_negative", "Amount must not be negative"));
    }
    Ok(())
}

pub(crate) fn positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    within_max(value)?;
    if *value <= Decimal::ZERO {
        return Err(money_error("positive", "Amount must be greater than zero"));
    }
    Ok(())
}

pub(crate) fn non_zero_amount(value: &Decimal) -> Result<(), ValidationError> {
    within_max(value)?;
    if value.is_zero() {
        return Err(money_error("non_zero", "Amount must not be zero"));
    }
    Ok(())
}

pub(crate) fn adjustment_percent_range(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::from(-100) || *value > Decimal::from(500) {
        return Err(money_error(
            "range",
            "Adjustment percent must be between -100 and 500",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_validators() {
        assert!(non_negative_amount(&Decimal::ZERO).is_ok());
        assert!(non_negative_amount(&Decimal::new(-1, 2)).is_err());
        assert!(positive_amount(&Decimal::ZERO).is_err());
        assert!(positive_amount(&Decimal::new(1, 2)).is_ok());
        assert!(non_zero_amount(&Decimal::new(-500, 2)).is_ok());
        assert!(non_zero_amount(&Decimal::ZERO).is_err());
    }

    #[test]
    fn test_amounts_fit_the_money_column() {
        assert_eq!(MAX_AMOUNT, "9999999999.99".parse::<Decimal>().unwrap());
        assert!(non_negative_amount(&MAX_AMOUNT).is_ok());

        let too_large = MAX_AMOUNT + Decimal::new(1, 2);
        assert!(non_negative_amount(&too_large).is_err());
        assert!(positive_amount(&too_large).is_err());
        assert!(non_zero_amount(&-too_large).is_err());
        assert!(non_negative_amount(&Decimal::MAX).is_err());

        assert_eq!(bounded_amount(MAX_AMOUNT), Some(MAX_AMOUNT));
        assert_eq!(bounded_amount(-too_large), None);
    }

    #[test]
    fn test_adjustment_percent_bounds() {
        assert!(adjustment_percent_range(&Decimal::from(-100)).is_ok());
        assert!(adjustment_percent_range(&Decimal::from(500)).is_ok());
        assert!(adjustment_percent_range(&Decimal::from(-101)).is_err());
        assert!(adjustment_percent_range(&Decimal::new(50001, 2)).is_err());
    }
}
