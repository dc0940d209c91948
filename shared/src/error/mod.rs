//! Unified error system
//!
//! - [`ErrorCode`]: numeric codes shared by server and clients
//! - [`ErrorCategory`]: classification by code range
//! - [`AppError`]: code, message and optional details
//! - [`ApiResponse`]: the JSON envelope every error is rendered into
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: License errors
//! - 4xxx: Reservation errors
//! - 5xxx: Billing errors
//! - 6xxx: Inventory errors (properties, room types, rooms, rate plans)
//! - 7xxx: Guest service errors (guests, orders, requests, messages)
//! - 8xxx: Staff errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::RoomTypeSoldOut)
//!     .with_detail("room_type_id", 3);
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(4004));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
