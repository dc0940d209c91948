//! Property Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Property (a hotel, hostel or B&B)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Property {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub timezone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create property payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PropertyCreate {
    #[validate(length(min = 1, max = 200, message = "Property name is required"))]
    pub name: String,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(email(message = "Email is not valid"))]
    pub email: Option<String>,
    /// IANA zone name, defaults to UTC
    #[validate(length(min = 1, max = 64))]
    pub timezone: Option<String>,
}

/// Update property payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PropertyUpdate {
    #[validate(length(min = 1, max = 200, message = "Property name is required"))]
    pub name: Option<String>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(email(message = "Email is not valid"))]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub timezone: Option<String>,
}
