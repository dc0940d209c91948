//! Occupancy forecast, rate recommendations, guest churn and payment screening
//!
//! Everything is computed by fixed rules from data already on the books.
//! Each endpoint is gated by its license feature (`demand_forecasting`,
//! `dynamic_pricing`, `guest_churn`, `fraud_detection`).

use chrono::{DateTime, NaiveDate, Timelike};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    ChurnRisk, DemandForecast, FraudAction, FraudAssessment, FraudReason, INSIGHT_FEATURES,
    InsightFeature, InsightStatus, RecommendedAction, RiskSegment, ForecastDay, percent, stay,
};

use crate::db::insights::{GuestHistory, PaymentSignals};
use crate::license::LicenseSnapshot;

pub const DEFAULT_FORECAST_DAYS: u32 = 14;
pub const MAX_FORECAST_DAYS: u32 = 90;

/// Requested horizon, defaulting to two weeks
pub fn forecast_days(requested: Option<u32>) -> Result<u32, AppError> {
    let days = requested.unwrap_or(DEFAULT_FORECAST_DAYS);
    if !(1..=MAX_FORECAST_DAYS).contains(&days) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("days must be between 1 and {MAX_FORECAST_DAYS}"),
        )
        .with_detail("days", days));
    }
    Ok(days)
}

/// Per-night occupancy from `(night, rooms booked)` pairs
pub fn build_forecast(
    property_id: i64,
    rooms_total: i64,
    nights: Vec<(NaiveDate, i64)>,
) -> DemandForecast {
    let days: Vec<ForecastDay> = nights
        .into_iter()
        .map(|(date, booked)| ForecastDay {
            date,
            rooms_total,
            rooms_booked: booked,
            rooms_available: (rooms_total - booked).max(0),
            occupancy_percent: percent(booked, rooms_total),
        })
        .collect();

    let average = if days.is_empty() {
        0.0
    } else {
        let sum: f64 = days.iter().map(|d| d.occupancy_percent).sum();
        (sum / days.len() as f64 * 100.0).round() / 100.0
    };

    DemandForecast {
        property_id,
        days,
        average_occupancy_percent: average,
    }
}

/// Rate multiplier for an occupancy level
pub fn demand_factor(occupancy_percent: f64) -> Decimal {
    if occupancy_percent < 30.0 {
        Decimal::new(85, 2)
    } else if occupancy_percent <= 60.0 {
        Decimal::ONE
    } else if occupancy_percent <= 80.0 {
        Decimal::new(110, 2)
    } else {
        Decimal::new(125, 2)
    }
}

const MIN_FACTOR: Decimal = Decimal::from_parts(80, 0, 0, false, 2);
const MAX_FACTOR: Decimal = Decimal::from_parts(130, 0, 0, false, 2);

/// Recommended rate and its change against the base rate, in percent
pub fn recommend_rate(base_rate: Decimal, occupancy_percent: f64) -> (Decimal, Decimal) {
    let factor = demand_factor(occupancy_percent).clamp(MIN_FACTOR, MAX_FACTOR);
    let recommended = stay::round_money(base_rate * factor);

    let change = if base_rate.is_zero() {
        Decimal::ZERO
    } else {
        stay::round_money((recommended - base_rate) / base_rate * Decimal::ONE_HUNDRED)
    };
    (recommended, change)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Churn likelihood in `0.0..=1.0`
///
/// Starts from how long ago the last completed stay ended, then moves with
/// loyalty, the share of cancelled or no-show bookings and any booking
/// still ahead.
pub fn churn_score(history: &GuestHistory, today: NaiveDate) -> f64 {
    let mut score = match history.last_stay.map(|d| (today - d).num_days().max(0)) {
        None => 0.5,
        Some(days) if days > 365 => 0.8,
        Some(days) if days > 180 => 0.6,
        Some(days) if days > 90 => 0.4,
        Some(_) => 0.2,
    };
    if history.completed_stays >= 3 {
        score -= 0.15;
    } else if history.completed_stays == 1 {
        score += 0.05;
    }
    if history.total_bookings > 0 {
        score += 0.3 * history.lost_bookings as f64 / history.total_bookings as f64;
    }
    if history.upcoming_stays > 0 {
        score -= 0.3;
    }
    round2(score.clamp(0.0, 1.0))
}

fn action(action: &str, details: &str) -> RecommendedAction {
    RecommendedAction {
        action: action.into(),
        details: details.into(),
    }
}

pub fn churn_actions(segment: RiskSegment) -> Vec<RecommendedAction> {
    match segment {
        RiskSegment::High => vec![
            action("loyalty_offer", "Offer a discount on the next stay"),
            action("personal_outreach", "Manager to contact the guest"),
        ],
        RiskSegment::Medium => vec![action("feedback_request", "Ask the guest for feedback")],
        RiskSegment::Low => Vec::new(),
    }
}

pub fn assess_churn(guest_id: i64, history: &GuestHistory, today: NaiveDate) -> ChurnRisk {
    let score = churn_score(history, today);
    let segment = RiskSegment::from_score(score);
    ChurnRisk {
        guest_id,
        completed_stays: history.completed_stays,
        days_since_last_stay: history.last_stay.map(|d| (today - d).num_days().max(0)),
        lifetime_value: history.lifetime_value,
        churn_score: score,
        risk_segment: segment,
        recommended_actions: churn_actions(segment),
    }
}

/// `|amount - average| / average` above this is unusual for the guest
const AMOUNT_DEVIATION_LIMIT: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
/// More payments than this within 24 hours
const VELOCITY_LIMIT: i64 = 3;
const OFF_HOURS_END: u32 = 6;

fn reason_weight(reason: FraudReason) -> f64 {
    match reason {
        FraudReason::AmountDeviation => 0.45,
        FraudReason::Velocity => 0.35,
        FraudReason::Overpayment => 0.3,
        FraudReason::OffHours => 0.1,
    }
}

/// Rules that fire for a payment
pub fn fraud_reasons(signals: &PaymentSignals) -> Vec<FraudReason> {
    let mut reasons = Vec::new();
    if let Some(average) = signals.guest_average
        && average > Decimal::ZERO
        && (signals.amount - average).abs() / average > AMOUNT_DEVIATION_LIMIT
    {
        reasons.push(FraudReason::AmountDeviation);
    }
    if signals.recent_payments > VELOCITY_LIMIT {
        reasons.push(FraudReason::Velocity);
    }
    if signals.balance < Decimal::ZERO {
        reasons.push(FraudReason::Overpayment);
    }
    if DateTime::from_timestamp_millis(signals.created_at).is_some_and(|t| t.hour() < OFF_HOURS_END)
    {
        reasons.push(FraudReason::OffHours);
    }
    reasons
}

/// Score the fired rules: above 0.5 is flagged for review, above 0.7 blocked
pub fn screen_payment(signals: &PaymentSignals) -> FraudAssessment {
    let reasons = fraud_reasons(signals);
    let score = round2(reasons.iter().map(|r| reason_weight(*r)).sum::<f64>().min(1.0));
    let flagged = score > 0.5;
    let recommended_action = if score > 0.7 {
        FraudAction::Block
    } else if flagged {
        FraudAction::Review
    } else {
        FraudAction::Accept
    };
    FraudAssessment {
        payment_id: signals.payment_id,
        reservation_id: signals.reservation_id,
        amount: signals.amount,
        risk_score: score,
        flagged,
        recommended_action,
        reasons,
    }
}

pub fn insight_status(license: &LicenseSnapshot) -> InsightStatus {
    InsightStatus {
        license_valid: !license.is_expired(),
        tier: license.tier.as_db().to_string(),
        expires_at: license.expires_at,
        features: INSIGHT_FEATURES
            .iter()
            .map(|name| InsightFeature {
                name: name.to_string(),
                available: license.can_use(name),
            })
            .collect(),
    }
}
