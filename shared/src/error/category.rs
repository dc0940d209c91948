//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// License / account errors (3xxx)
    License,
    /// Reservation errors (4xxx)
    Reservation,
    /// Billing errors (5xxx)
    Billing,
    /// Inventory errors (6xxx)
    Inventory,
    /// Guest service errors (7xxx)
    GuestService,
    /// Staff errors (8xxx)
    Staff,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::License,
            4000..5000 => Self::Reservation,
            5000..6000 => Self::Billing,
            6000..7000 => Self::Inventory,
            7000..8000 => Self::GuestService,
            8000..9000 => Self::Staff,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::License => "license",
            Self::Reservation => "reservation",
            Self::Billing => "billing",
            Self::Inventory => "inventory",
            Self::GuestService => "guest_service",
            Self::Staff => "staff",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::License);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Reservation);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Billing);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Inventory);
        assert_eq!(ErrorCategory::from_code(7001), ErrorCategory::GuestService);
        assert_eq!(ErrorCategory::from_code(8001), ErrorCategory::Staff);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::TokenExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::LicenseExpired.category(), ErrorCategory::License);
        assert_eq!(
            ErrorCode::RoomTypeSoldOut.category(),
            ErrorCategory::Reservation
        );
        assert_eq!(ErrorCode::FolioUnsettled.category(), ErrorCategory::Billing);
        assert_eq!(ErrorCode::RoomInUse.category(), ErrorCategory::Inventory);
        assert_eq!(ErrorCode::OrderEmpty.category(), ErrorCategory::GuestService);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::GuestService).unwrap();
        assert_eq!(json, "\"guest_service\"");

        let category: ErrorCategory = serde_json::from_str("\"license\"").unwrap();
        assert_eq!(category, ErrorCategory::License);
    }
}
