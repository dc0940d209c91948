//! Room Type Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Sellable room category within a property (e.g. "Double", "Suite")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RoomType {
    pub id: i64,
    pub property_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub base_rate: Decimal,
    pub max_occupancy: i32,
    pub created_at: i64,
}

/// Create room type payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoomTypeCreate {
    #[validate(length(min = 1, max = 100, message = "Room type name is required"))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = "super::non_negative_amount"))]
    pub base_rate: Decimal,
    #[validate(range(min = 1, max = 50, message = "Max occupancy must be between 1 and 50"))]
    pub max_occupancy: i32,
}

/// Update room type payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RoomTypeUpdate {
    #[validate(length(min = 1, max = 100, message = "Room type name is required"))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(custom(function = "super::non_negative_amount"))]
    pub base_rate: Option<Decimal>,
    #[validate(range(min = 1, max = 50, message = "Max occupancy must be between 1 and 50"))]
    pub max_occupancy: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_type_rules() {
        let mut payload = RoomTypeCreate {
            name: "Double".into(),
            description: None,
            base_rate: Decimal::new(12000, 2),
            max_occupancy: 2,
        };
        assert!(payload.validate().is_ok());

        payload.max_occupancy = 0;
        assert!(payload.validate().is_err());

        payload.max_occupancy = 2;
        payload.base_rate = Decimal::new(-1, 0);
        assert!(payload.validate().is_err());
    }
}
