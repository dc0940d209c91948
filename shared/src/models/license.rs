//! License Model
//!
//! Tiers, their quotas and the gated features.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const FEATURE_DEMAND_FORECASTING: &str = "demand_forecasting";
pub const FEATURE_DYNAMIC_PRICING: &str = "dynamic_pricing";
pub const FEATURE_GUEST_CHURN: &str = "guest_churn";
pub const FEATURE_FRAUD_DETECTION: &str = "fraud_detection";

/// Every gated insight feature, in listing order
pub const INSIGHT_FEATURES: [&str; 4] = [
    FEATURE_DEMAND_FORECASTING,
    FEATURE_DYNAMIC_PRICING,
    FEATURE_GUEST_CHURN,
    FEATURE_FRAUD_DETECTION,
];

/// License tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseTier {
    Trial,
    Basic,
    Professional,
    Enterprise,
}

impl LicenseTier {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "trial" => Some(Self::Trial),
            "basic" => Some(Self::Basic),
            "professional" => Some(Self::Professional),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Basic => "basic",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }

    pub fn max_properties(&self) -> i32 {
        match self {
            Self::Trial | Self::Basic => 1,
            Self::Professional => 5,
            Self::Enterprise => 100,
        }
    }

    pub fn max_rooms(&self) -> i32 {
        match self {
            Self::Trial => 20,
            Self::Basic => 50,
            Self::Professional => 500,
            Self::Enterprise => 10_000,
        }
    }

    pub fn features(&self) -> Vec<String> {
        let features: &[&str] = match self {
            Self::Trial => &[FEATURE_DEMAND_FORECASTING],
            Self::Basic => &[],
            Self::Professional => &[FEATURE_DEMAND_FORECASTING, FEATURE_DYNAMIC_PRICING],
            Self::Enterprise => &[
                FEATURE_DEMAND_FORECASTING,
                FEATURE_DYNAMIC_PRICING,
                FEATURE_GUEST_CHURN,
                FEATURE_FRAUD_DETECTION,
            ],
        };
        features.iter().map(|f| f.to_string()).collect()
    }
}

/// Stored license status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseStatus {
    Trial,
    Active,
    Expired,
}

impl LicenseStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "trial" => Some(Self::Trial),
            "active" => Some(Self::Active),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }
}

/// License row (one per account)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct License {
    pub id: i64,
    pub account_id: i64,
    pub tier: String,
    pub status: String,
    pub max_properties: i32,
    pub max_rooms: i32,
    pub features: Vec<String>,
    pub starts_at: i64,
    pub expires_at: i64,
    #[serde(skip_serializing)]
    pub license_key_hash: Option<String>,
    pub updated_at: i64,
}

/// License summary returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub tier: LicenseTier,
    pub status: LicenseStatus,
    pub max_properties: i32,
    pub max_rooms: i32,
    pub features: Vec<String>,
    pub starts_at: i64,
    pub expires_at: i64,
    pub days_remaining: i64,
    pub properties_used: i64,
    pub rooms_used: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivateLicenseRequest {
    #[validate(length(min = 1, max = 512, message = "License key is required"))]
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_quotas() {
        assert_eq!(LicenseTier::Trial.max_properties(), 1);
        assert_eq!(LicenseTier::Trial.max_rooms(), 20);
        assert_eq!(LicenseTier::Professional.max_properties(), 5);
        assert_eq!(LicenseTier::Enterprise.max_rooms(), 10_000);
    }

    #[test]
    fn test_tier_features() {
        assert_eq!(LicenseTier::Trial.features(), vec![FEATURE_DEMAND_FORECASTING]);
        assert!(LicenseTier::Basic.features().is_empty());
        assert!(
            LicenseTier::Professional
                .features()
                .contains(&FEATURE_DYNAMIC_PRICING.to_string())
        );
        assert_eq!(LicenseTier::Enterprise.features().len(), 4);
    }

    #[test]
    fn test_tier_db_roundtrip() {
        for tier in [
            LicenseTier::Trial,
            LicenseTier::Basic,
            LicenseTier::Professional,
            LicenseTier::Enterprise,
        ] {
            assert_eq!(LicenseTier::from_db(tier.as_db()), Some(tier));
        }
        assert_eq!(LicenseTier::from_db("gold"), None);
    }
}
