//! Room Model

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

const MAX_ROOM_NUMBER_LEN: usize = 20;

/// Housekeeping / service status of a physical room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Available,
    Occupied,
    Dirty,
    OutOfService,
}

impl RoomStatus {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "dirty" => Some(Self::Dirty),
            "out_of_service" => Some(Self::OutOfService),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Dirty => "dirty",
            Self::OutOfService => "out_of_service",
        }
    }

    /// Counts toward sellable inventory
    pub fn is_in_service(&self) -> bool {
        !matches!(self, Self::OutOfService)
    }

    /// Housekeeping change made by hand
    ///
    /// `occupied` is owned by check-in and check-out and can be neither
    /// entered nor left this way.
    pub fn can_set_manually(&self, next: RoomStatus) -> bool {
        *self != next && !matches!(self, Self::Occupied) && next != Self::Occupied
    }
}

/// Physical room
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Room {
    pub id: i64,
    pub property_id: i64,
    pub room_type_id: i64,
    pub number: String,
    pub floor: Option<i32>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: i64,
}

impl Room {
    pub fn status(&self) -> Option<RoomStatus> {
        RoomStatus::from_db(&self.status)
    }
}

/// Room numbers are stored trimmed, so the trimmed value is what must fit
fn room_number(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    let message = if len == 0 {
        "Room number is required".to_string()
    } else if len > MAX_ROOM_NUMBER_LEN {
        format!("Room number must be at most {MAX_ROOM_NUMBER_LEN} characters")
    } else {
        return Ok(());
    };
    Err(ValidationError::new("room_number").with_message(message.into()))
}

/// Create room payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoomCreate {
    pub room_type_id: i64,
    #[validate(custom(function = "room_number"))]
    pub number: String,
    pub floor: Option<i32>,
    pub status: Option<RoomStatus>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Update room payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct RoomUpdate {
    pub room_type_id: Option<i64>,
    #[validate(custom(function = "room_number"))]
    pub number: Option<String>,
    pub floor: Option<i32>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Housekeeping status change
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoomStatusUpdate {
    pub status: RoomStatus,
}

/// Room list filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomQuery {
    pub status: Option<RoomStatus>,
    pub room_type_id: Option<i64>,
}
