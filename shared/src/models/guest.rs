//! Guest Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Guest profile, shared across the account's properties
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Guest {
    pub id: i64,
    pub account_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub nationality: Option<String>,
    pub document_number: Option<String>,
    pub notes: Option<String>,
    pub is_vip: bool,
    pub created_at: i64,
}

impl Guest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Create guest payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GuestCreate {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 40, message = "Phone is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 60))]
    pub nationality: Option<String>,
    #[validate(length(max = 60))]
    pub document_number: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_vip: bool,
}

/// Update guest payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct GuestUpdate {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Email is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 40, message = "Phone is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 60))]
    pub nationality: Option<String>,
    #[validate(length(max = 60))]
    pub document_number: Option<String>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    pub is_vip: Option<bool>,
}
