//! Room service: guest service requests and in-room orders

use super::bounded_amount;
use super::stay::round_money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Housekeeping,
    Maintenance,
    Amenity,
    Concierge,
    Other,
}

impl ServiceCategory {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Housekeeping => "housekeeping",
            Self::Maintenance => "maintenance",
            Self::Amenity => "amenity",
            Self::Concierge => "concierge",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl RequestPriority {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::InProgress | Self::Cancelled)
                | (Self::InProgress, Self::Completed | Self::Cancelled)
        )
    }
}

/// Guest service request (towels, broken AC, taxi...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ServiceRequest {
    pub id: i64,
    pub reservation_id: i64,
    pub category: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceRequestCreate {
    pub category: ServiceCategory,
    #[validate(length(min = 1, max = 2000, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub priority: RequestPriority,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceRequestStatusUpdate {
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceRequestQuery {
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "preparing" => Some(Self::Preparing),
            "delivered" => Some(Self::Delivered),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Preparing | Self::Cancelled)
                | (Self::Preparing, Self::Delivered | Self::Cancelled)
        )
    }
}

/// In-room order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GuestOrder {
    pub id: i64,
    pub reservation_id: i64,
    pub status: String,
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_at: i64,
    pub delivered_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GuestOrderItem {
    pub id: i64,
    pub order_id: i64,
    pub name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    #[validate(length(min = 1, max = 200, message = "Item name is required"))]
    pub name: String,
    #[validate(range(min = 1, max = 100, message = "Quantity must be between 1 and 100"))]
    pub quantity: i32,
    #[validate(custom(function = "super::non_negative_amount"))]
    pub unit_price: Decimal,
}

impl OrderItemInput {
    /// `None` when the line does not fit a money column
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .map(round_money)
            .and_then(bounded_amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(nested)]
    pub items: Vec<OrderItemInput>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl OrderCreate {
    /// Sum of the line totals; `None` on overflow
    pub fn total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
            .and_then(bounded_amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
}

/// Order with its line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: GuestOrder,
    pub items: Vec<GuestOrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, quantity: i32, price: &str) -> OrderItemInput {
        OrderItemInput {
            name: name.into(),
            quantity,
            unit_price: price.parse().unwrap(),
        }
    }

    #[test]
    fn test_order_total() {
        let order = OrderCreate {
            items: vec![item("Club sandwich", 2, "14.50"), item("Sparkling water", 3, "3.25")],
            notes: None,
        };
        assert_eq!(order.total(), Some("38.75".parse::<Decimal>().unwrap()));
        assert!(order.validate().is_ok());
    }

    #[test]
    fn test_order_total_overflow() {
        let single = OrderCreate {
            items: vec![item("Vintage cellar", 100, "1000000000000000000000000000")],
            notes: None,
        };
        assert!(single.validate().is_err());
        assert_eq!(single.total(), None);

        // each line fits, the sum does not
        let many = OrderCreate {
            items: vec![item("Suite upgrade", 1, "9999999999.99"); 2],
            notes: None,
        };
        assert!(many.validate().is_ok());
        assert!(many.items[0].line_total().is_some());
        assert_eq!(many.total(), None);
    }

    #[test]
    fn test_order_item_validation() {
        let order = OrderCreate {
            items: vec![item("Club sandwich", 0, "14.50")],
            notes: None,
        };
        assert!(order.validate().is_err());
    }

    #[test]
    fn test_order_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_request_transitions() {
        assert!(RequestStatus::Open.can_transition_to(RequestStatus::InProgress));
        assert!(RequestStatus::InProgress.can_transition_to(RequestStatus::Completed));
        assert!(!RequestStatus::Open.can_transition_to(RequestStatus::Completed));
        assert!(!RequestStatus::Completed.can_transition_to(RequestStatus::Open));
        assert!(!RequestStatus::Cancelled.can_transition_to(RequestStatus::InProgress));
    }
}
