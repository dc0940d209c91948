//! Stay arithmetic
//!
//! Nights, nightly rate adjustments and stay totals. A stay occupies the
//! half-open date range `[check_in, check_out)`: the departure day is free
//! for the next arrival.

use super::bounded_amount;
use crate::error::{AppError, ErrorCode};
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

/// Longest stay (and search range) accepted
pub const MAX_STAY_NIGHTS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StayError {
    #[error("Check-out date must be after check-in date")]
    CheckOutNotAfterCheckIn,
    #[error("A stay cannot exceed {} nights", MAX_STAY_NIGHTS)]
    TooLong,
    #[error("Stay total is too large")]
    TotalOutOfRange,
}

impl From<StayError> for AppError {
    fn from(err: StayError) -> Self {
        match err {
            StayError::CheckOutNotAfterCheckIn => AppError::new(ErrorCode::InvalidStayDates),
            StayError::TooLong => AppError::with_message(ErrorCode::ValueOutOfRange, err.to_string())
                .with_detail("max_nights", MAX_STAY_NIGHTS),
            StayError::TotalOutOfRange => {
                AppError::with_message(ErrorCode::ValueOutOfRange, err.to_string())
            }
        }
    }
}

/// Number of nights between check-in and check-out, at most [`MAX_STAY_NIGHTS`]
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> Result<i64, StayError> {
    let n = (check_out - check_in).num_days();
    if n <= 0 {
        return Err(StayError::CheckOutNotAfterCheckIn);
    }
    if n > MAX_STAY_NIGHTS {
        return Err(StayError::TooLong);
    }
    Ok(n)
}

/// Round money to cents, midpoint away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Apply a percentage adjustment to a base rate (`-15` is 15 % off)
///
/// Never returns a negative rate.
pub fn apply_adjustment(base_rate: Decimal, adjustment_percent: Decimal) -> Decimal {
    let factor = Decimal::ONE + adjustment_percent / Decimal::ONE_HUNDRED;
    round_money(base_rate * factor).max(Decimal::ZERO)
}

/// Total for a stay at a flat nightly rate; must fit a money column
pub fn stay_total(nightly_rate: Decimal, nights: i64) -> Result<Decimal, StayError> {
    nightly_rate
        .checked_mul(Decimal::from(nights))
        .map(round_money)
        .and_then(bounded_amount)
        .ok_or(StayError::TotalOutOfRange)
}

/// Half-open range overlap
pub fn overlaps(a_in: NaiveDate, a_out: NaiveDate, b_in: NaiveDate, b_out: NaiveDate) -> bool {
    a_in < b_out && b_in < a_out
}

/// Every night of a stay, from check-in up to (not including) check-out
pub fn stay_dates(check_in: NaiveDate, check_out: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    check_in
        .iter_days()
        .take_while(move |d| *d < check_out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_nights() {
        assert_eq!(nights(d(2026, 3, 1), d(2026, 3, 4)), Ok(3));
        assert_eq!(nights(d(2026, 2, 28), d(2026, 3, 1)), Ok(1));
        assert_eq!(nights(d(2024, 12, 31), d(2025, 1, 2)), Ok(2));
    }

    #[test]
    fn test_nights_rejects_same_day_and_reversed() {
        assert_eq!(
            nights(d(2026, 3, 1), d(2026, 3, 1)),
            Err(StayError::CheckOutNotAfterCheckIn)
        );
        assert!(nights(d(2026, 3, 5), d(2026, 3, 1)).is_err());

        let err: AppError = StayError::CheckOutNotAfterCheckIn.into();
        assert_eq!(err.code, ErrorCode::InvalidStayDates);
    }

    #[test]
    fn test_apply_adjustment() {
        assert_eq!(apply_adjustment(dec("100"), dec("-15")), dec("85.00"));
        assert_eq!(apply_adjustment(dec("120"), dec("0")), dec("120.00"));
        assert_eq!(apply_adjustment(dec("99.99"), dec("12.5")), dec("112.49"));
        assert_eq!(apply_adjustment(dec("80"), dec("-100")), Decimal::ZERO);
        assert_eq!(apply_adjustment(dec("80"), dec("-150")), Decimal::ZERO);
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(round_money(dec("10.125")), dec("10.13"));
        assert_eq!(round_money(dec("10.135")), dec("10.14"));
    }

    #[test]
    fn test_stay_total() {
        assert_eq!(stay_total(dec("85.00"), 3), Ok(dec("255.00")));
        assert_eq!(stay_total(dec("112.49"), 7), Ok(dec("787.43")));
    }

    #[test]
    fn test_stay_total_out_of_range() {
        // a rate at the column limit times a year of nights
        assert_eq!(
            stay_total(dec("9999999999.99"), 365),
            Err(StayError::TotalOutOfRange)
        );
        assert_eq!(stay_total(Decimal::MAX, 2), Err(StayError::TotalOutOfRange));

        let err: AppError = StayError::TotalOutOfRange.into();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_nights_capped() {
        assert_eq!(nights(d(2026, 1, 1), d(2027, 1, 1)), Ok(365));
        assert_eq!(nights(d(2026, 1, 1), d(2027, 1, 2)), Err(StayError::TooLong));
        assert_eq!(
            nights(d(2026, 1, 1), d(9999, 1, 1)),
            Err(StayError::TooLong)
        );

        let err: AppError = StayError::TooLong.into();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert!(err.message.contains("365"));
    }

    #[test]
    fn test_overlaps_half_open() {
        // back-to-back stays share the changeover day
        assert!(!overlaps(d(2026, 3, 1), d(2026, 3, 4), d(2026, 3, 4), d(2026, 3, 6)));
        assert!(!overlaps(d(2026, 3, 4), d(2026, 3, 6), d(2026, 3, 1), d(2026, 3, 4)));

        assert!(overlaps(d(2026, 3, 1), d(2026, 3, 4), d(2026, 3, 3), d(2026, 3, 6)));
        assert!(overlaps(d(2026, 3, 1), d(2026, 3, 10), d(2026, 3, 3), d(2026, 3, 4)));
        assert!(overlaps(d(2026, 3, 2), d(2026, 3, 3), d(2026, 3, 1), d(2026, 3, 5)));
    }

    #[test]
    fn test_stay_dates() {
        let dates: Vec<_> = stay_dates(d(2026, 3, 30), d(2026, 4, 2)).collect();
        assert_eq!(dates, vec![d(2026, 3, 30), d(2026, 3, 31), d(2026, 4, 1)]);
        assert_eq!(stay_dates(d(2026, 3, 1), d(2026, 3, 1)).count(), 0);
    }
}
