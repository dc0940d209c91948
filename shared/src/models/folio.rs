//! Folio (guest bill) Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKind {
    Room,
    RoomService,
    Incidental,
    Adjustment,
}

impl ChargeKind {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::RoomService => "room_service",
            Self::Incidental => "incidental",
            Self::Adjustment => "adjustment",
        }
    }

    /// Kinds staff may post by hand
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Incidental | Self::Adjustment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::BankTransfer => "bank_transfer",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FolioCharge {
    pub id: i64,
    pub reservation_id: i64,
    pub kind: String,
    pub description: String,
    pub amount: Decimal,
    pub source_order_id: Option<i64>,
    pub voided: bool,
    pub created_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct FolioPayment {
    pub id: i64,
    pub reservation_id: i64,
    pub amount: Decimal,
    pub method: String,
    pub reference: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChargeCreate {
    pub kind: ChargeKind,
    #[validate(length(min = 1, max = 300, message = "Description is required"))]
    pub description: String,
    /// Negative amounts are allowed for adjustments
    #[validate(custom(function = "super::non_zero_amount"))]
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentCreate {
    #[validate(custom(function = "super::positive_amount"))]
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[validate(length(max = 200))]
    pub reference: Option<String>,
}

/// Full folio with running totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folio {
    pub reservation_id: i64,
    pub charges: Vec<FolioCharge>,
    pub payments: Vec<FolioPayment>,
    pub total_charges: Decimal,
    pub total_payments: Decimal,
    pub balance: Decimal,
}

impl Folio {
    /// Build the folio; voided charges are listed but not counted
    pub fn new(reservation_id: i64, charges: Vec<FolioCharge>, payments: Vec<FolioPayment>) -> Self {
        let total_charges: Decimal = charges
            .iter()
            .filter(|c| !c.voided)
            .map(|c| c.amount)
            .sum();
        let total_payments: Decimal = payments.iter().map(|p| p.amount).sum();
        Self {
            reservation_id,
            charges,
            payments,
            total_charges,
            total_payments,
            balance: total_charges - total_payments,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.balance <= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge(amount: &str, voided: bool) -> FolioCharge {
        FolioCharge {
            id: 0,
            reservation_id: 1,
            kind: "incidental".into(),
            description: "Minibar".into(),
            amount: amount.parse().unwrap(),
            source_order_id: None,
            voided,
            created_by: None,
            created_at: 0,
        }
    }

    fn payment(amount: &str) -> FolioPayment {
        FolioPayment {
            id: 0,
            reservation_id: 1,
            amount: amount.parse().unwrap(),
            method: "card".into(),
            reference: None,
            created_by: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_folio_totals_skip_voided() {
        let folio = Folio::new(
            1,
            vec![charge("300.00", false), charge("25.50", true), charge("-20.00", false)],
            vec![payment("100.00")],
        );
        assert_eq!(folio.total_charges, Decimal::from(280));
        assert_eq!(folio.total_payments, Decimal::from(100));
        assert_eq!(folio.balance, Decimal::from(180));
        assert!(!folio.is_settled());
        assert_eq!(folio.charges.len(), 3);
    }

    #[test]
    fn test_folio_settled_when_paid_or_overpaid() {
        let folio = Folio::new(1, vec![charge("80.00", false)], vec![payment("80.00")]);
        assert!(folio.is_settled());

        let overpaid = Folio::new(1, vec![charge("80.00", false)], vec![payment("90.00")]);
        assert!(overpaid.is_settled());
    }

    #[test]
    fn test_payment_must_be_positive() {
        let p = PaymentCreate {
            amount: Decimal::ZERO,
            method: PaymentMethod::Cash,
            reference: None,
        };
        assert!(p.validate().is_err());
    }
}
