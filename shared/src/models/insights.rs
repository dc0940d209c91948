//! Guest churn, payment screening and insight status DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskSegment {
    Low,
    Medium,
    High,
}

impl RiskSegment {
    /// Above 0.7 is high, above 0.4 medium
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Self::High
        } else if score > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedAction {
    pub action: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnRisk {
    pub guest_id: i64,
    pub completed_stays: i64,
    pub days_since_last_stay: Option<i64>,
    pub lifetime_value: Decimal,
    /// 0.0 ..= 1.0
    pub churn_score: f64,
    pub risk_segment: RiskSegment,
    pub recommended_actions: Vec<RecommendedAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudAction {
    Accept,
    Review,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudReason {
    /// Far from what the guest usually pays
    AmountDeviation,
    /// Many payments from the guest in the last 24 hours
    Velocity,
    /// Payments exceed the folio's charges
    Overpayment,
    /// Taken between 00:00 and 06:00 UTC
    OffHours,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAssessment {
    pub payment_id: i64,
    pub reservation_id: i64,
    pub amount: Decimal,
    /// 0.0 ..= 1.0
    pub risk_score: f64,
    pub flagged: bool,
    pub recommended_action: FraudAction,
    pub reasons: Vec<FraudReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightFeature {
    pub name: String,
    pub available: bool,
}

/// Which insight features the current license unlocks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightStatus {
    pub license_valid: bool,
    pub tier: String,
    pub expires_at: i64,
    pub features: Vec<InsightFeature>,
}
