//! Guest Message Model

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    /// Guest to hotel
    Inbound,
    /// Hotel to guest
    Outbound,
}

impl MessageDirection {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GuestMessage {
    pub id: i64,
    pub reservation_id: i64,
    pub direction: String,
    pub body: String,
    pub sender_user_id: Option<i64>,
    pub read_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MessageCreate {
    pub direction: MessageDirection,
    #[validate(length(min = 1, max = 4000, message = "Message body is required"))]
    pub body: String,
}
