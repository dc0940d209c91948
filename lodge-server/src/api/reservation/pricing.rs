//! Nightly rate selection

use rust_decimal::Decimal;
use shared::models::{RatePlan, stay};

/// Manual override wins, then the rate plan, then the room type base rate
pub fn nightly_rate(
    base_rate: Decimal,
    rate_plan: Option<&RatePlan>,
    manual_rate: Option<Decimal>,
) -> Decimal {
    if let Some(rate) = manual_rate {
        return stay::round_money(rate);
    }
    match rate_plan {
        Some(plan) => stay::apply_adjustment(base_rate, plan.adjustment_percent),
        None => base_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(adjustment_percent: Decimal) -> RatePlan {
        RatePlan {
            id: 1,
            property_id: 1,
            room_type_id: None,
            name: "Non-refundable".into(),
            adjustment_percent,
            min_nights: 1,
            valid_from: None,
            valid_to: None,
            is_active: true,
            created_at: 0,
        }
    }

    #[test]
    fn test_base_rate_without_plan() {
        let base = Decimal::new(12000, 2);
        assert_eq!(nightly_rate(base, None, None), base);
    }

    #[test]
    fn test_plan_adjusts_base_rate() {
        let base = Decimal::new(12000, 2);
        let discount = plan(Decimal::from(-15));
        assert_eq!(nightly_rate(base, Some(&discount), None), Decimal::new(10200, 2));
    }

    #[test]
    fn test_manual_rate_wins() {
        let base = Decimal::new(12000, 2);
        let discount = plan(Decimal::from(-15));
        assert_eq!(
            nightly_rate(base, Some(&discount), Some(Decimal::new(9999, 2))),
            Decimal::new(9999, 2)
        );
        // a complimentary stay is allowed
        assert_eq!(
            nightly_rate(base, Some(&discount), Some(Decimal::ZERO)),
            Decimal::ZERO
        );
    }
}
