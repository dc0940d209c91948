//! Unified error codes for Lodge
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: License / account errors
//! - 4xxx: Reservation errors
//! - 5xxx: Billing (folio) errors
//! - 6xxx: Inventory errors (properties, room types, rooms, rate plans)
//! - 7xxx: Guest service errors (guests, orders, requests, messages)
//! - 8xxx: Staff errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values on the wire so clients can switch on them
/// without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Referenced record does not exist
    InvalidReference = 9,
    /// Rate limited
    TooManyRequests = 10,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// User account is deactivated
    AccountDisabled = 1005,
    /// Password too short
    PasswordTooShort = 1006,
    /// Username already taken
    UsernameExists = 1007,
    /// Email already registered
    EmailExists = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Owner role required
    OwnerRequired = 2002,
    /// Manager role (or higher) required
    ManagerRequired = 2003,
    /// Owner accounts cannot be modified by others
    CannotModifyOwner = 2004,
    /// Users cannot delete themselves
    CannotDeleteSelf = 2005,

    // ==================== 3xxx: License ====================
    /// Account has no license record
    LicenseMissing = 3001,
    /// License has expired
    LicenseExpired = 3002,
    /// License key malformed or signature mismatch
    LicenseKeyInvalid = 3003,
    /// License key expiry date already passed
    LicenseKeyExpired = 3004,
    /// License key issued for another account
    LicenseKeyMismatch = 3005,
    /// Feature not available in current license tier
    FeatureNotAvailable = 3006,
    /// Property quota exhausted
    PropertyLimitReached = 3007,
    /// Room quota exhausted
    RoomLimitReached = 3008,
    /// Account not found
    AccountNotFound = 3009,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Check-out not after check-in
    InvalidStayDates = 4002,
    /// Specific room already booked for the dates
    RoomUnavailable = 4003,
    /// No rooms of the type left for at least one night
    RoomTypeSoldOut = 4004,
    /// Status change not allowed from the current status
    InvalidStatusTransition = 4005,
    /// Reservation is checked in
    ReservationInProgress = 4006,
    /// Reservation is not checked in
    ReservationNotInHouse = 4007,
    /// Guest count exceeds room type occupancy
    OccupancyExceeded = 4008,
    /// Rate plan does not apply to this stay
    RatePlanNotApplicable = 4009,
    /// Check-in attempted outside the stay dates
    CheckInOutsideStay = 4010,
    /// Check-in requires an assigned room
    RoomNotAssigned = 4011,
    /// Reservation is cancelled, no-show or checked out
    ReservationClosed = 4012,

    // ==================== 5xxx: Billing ====================
    /// Folio has an outstanding balance
    FolioUnsettled = 5001,
    /// Folio charge not found
    ChargeNotFound = 5002,
    /// Folio charge already voided
    ChargeAlreadyVoided = 5003,
    /// Amount not allowed
    InvalidAmount = 5004,
    /// Folio payment not found
    PaymentNotFound = 5005,

    // ==================== 6xxx: Inventory ====================
    /// Property not found
    PropertyNotFound = 6001,
    /// Property still has active reservations
    PropertyHasReservations = 6002,
    /// Room type not found
    RoomTypeNotFound = 6101,
    /// Room type name already exists in property
    RoomTypeNameExists = 6102,
    /// Room type still referenced by rooms
    RoomTypeInUse = 6103,
    /// Room not found
    RoomNotFound = 6201,
    /// Room number already exists in property
    RoomNumberExists = 6202,
    /// Room still referenced by active reservations
    RoomInUse = 6203,
    /// Room is out of service
    RoomOutOfService = 6204,
    /// Rate plan not found
    RatePlanNotFound = 6301,

    // ==================== 7xxx: Guest services ====================
    /// Guest not found
    GuestNotFound = 7001,
    /// Guest still has reservations
    GuestHasReservations = 7002,
    /// Guest order not found
    OrderNotFound = 7101,
    /// Order has no items
    OrderEmpty = 7102,
    /// Service request not found
    ServiceRequestNotFound = 7201,
    /// Guest message not found
    MessageNotFound = 7301,

    // ==================== 8xxx: Staff ====================
    /// User not found
    UserNotFound = 8001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::InvalidReference => "Referenced record does not exist",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Session has expired",
            ErrorCode::TokenInvalid => "Session token is invalid",
            ErrorCode::AccountDisabled => "User account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::UsernameExists => "Username already exists",
            ErrorCode::EmailExists => "Email already registered",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::OwnerRequired => "Owner role is required",
            ErrorCode::ManagerRequired => "Manager role is required",
            ErrorCode::CannotModifyOwner => "Owner account cannot be modified",
            ErrorCode::CannotDeleteSelf => "Cannot delete your own account",

            // License
            ErrorCode::LicenseMissing => "No license found for this account",
            ErrorCode::LicenseExpired => "License has expired",
            ErrorCode::LicenseKeyInvalid => "License key is invalid",
            ErrorCode::LicenseKeyExpired => "License key has expired",
            ErrorCode::LicenseKeyMismatch => "License key belongs to another account",
            ErrorCode::FeatureNotAvailable => "Feature not available in your license",
            ErrorCode::PropertyLimitReached => "Property limit reached for your license",
            ErrorCode::RoomLimitReached => "Room limit reached for your license",
            ErrorCode::AccountNotFound => "Account not found",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::InvalidStayDates => "Check-out date must be after check-in date",
            ErrorCode::RoomUnavailable => "Room is not available for the selected dates",
            ErrorCode::RoomTypeSoldOut => "No rooms of this type are available for the selected dates",
            ErrorCode::InvalidStatusTransition => "Reservation status change is not allowed",
            ErrorCode::ReservationInProgress => "Reservation is checked in",
            ErrorCode::ReservationNotInHouse => "Reservation is not checked in",
            ErrorCode::OccupancyExceeded => "Guest count exceeds room type occupancy",
            ErrorCode::RatePlanNotApplicable => "Rate plan does not apply to this stay",
            ErrorCode::CheckInOutsideStay => "Check-in is only possible during the stay dates",
            ErrorCode::RoomNotAssigned => "A room must be assigned before check-in",
            ErrorCode::ReservationClosed => "Reservation is closed",

            // Billing
            ErrorCode::FolioUnsettled => "Folio has an outstanding balance",
            ErrorCode::ChargeNotFound => "Charge not found",
            ErrorCode::ChargeAlreadyVoided => "Charge is already voided",
            ErrorCode::InvalidAmount => "Amount is not valid",
            ErrorCode::PaymentNotFound => "Payment not found",

            // Inventory
            ErrorCode::PropertyNotFound => "Property not found",
            ErrorCode::PropertyHasReservations => "Property has active reservations",
            ErrorCode::RoomTypeNotFound => "Room type not found",
            ErrorCode::RoomTypeNameExists => "Room type name already exists",
            ErrorCode::RoomTypeInUse => "Room type is in use by rooms",
            ErrorCode::RoomNotFound => "Room not found",
            ErrorCode::RoomNumberExists => "Room number already exists",
            ErrorCode::RoomInUse => "Room has active reservations",
            ErrorCode::RoomOutOfService => "Room is out of service",
            ErrorCode::RatePlanNotFound => "Rate plan not found",

            // Guest services
            ErrorCode::GuestNotFound => "Guest not found",
            ErrorCode::GuestHasReservations => "Guest has reservations",
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::ServiceRequestNotFound => "Service request not found",
            ErrorCode::MessageNotFound => "Message not found",

            // Staff
            ErrorCode::UserNotFound => "User not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::Unknown,
            2 => ErrorCode::ValidationFailed,
            3 => ErrorCode::NotFound,
            4 => ErrorCode::AlreadyExists,
            5 => ErrorCode::InvalidRequest,
            6 => ErrorCode::InvalidFormat,
            7 => ErrorCode::RequiredField,
            8 => ErrorCode::ValueOutOfRange,
            9 => ErrorCode::InvalidReference,
            10 => ErrorCode::TooManyRequests,

            1001 => ErrorCode::NotAuthenticated,
            1002 => ErrorCode::InvalidCredentials,
            1003 => ErrorCode::TokenExpired,
            1004 => ErrorCode::TokenInvalid,
            1005 => ErrorCode::AccountDisabled,
            1006 => ErrorCode::PasswordTooShort,
            1007 => ErrorCode::UsernameExists,
            1008 => ErrorCode::EmailExists,

            2001 => ErrorCode::PermissionDenied,
            2002 => ErrorCode::OwnerRequired,
            2003 => ErrorCode::ManagerRequired,
            2004 => ErrorCode::CannotModifyOwner,
            2005 => ErrorCode::CannotDeleteSelf,

            3001 => ErrorCode::LicenseMissing,
            3002 => ErrorCode::LicenseExpired,
            3003 => ErrorCode::LicenseKeyInvalid,
            3004 => ErrorCode::LicenseKeyExpired,
            3005 => ErrorCode::LicenseKeyMismatch,
            3006 => ErrorCode::FeatureNotAvailable,
            3007 => ErrorCode::PropertyLimitReached,
            3008 => ErrorCode::RoomLimitReached,
            3009 => ErrorCode::AccountNotFound,

            4001 => ErrorCode::ReservationNotFound,
            4002 => ErrorCode::InvalidStayDates,
            4003 => ErrorCode::RoomUnavailable,
            4004 => ErrorCode::RoomTypeSoldOut,
            4005 => ErrorCode::InvalidStatusTransition,
            4006 => ErrorCode::ReservationInProgress,
            4007 => ErrorCode::ReservationNotInHouse,
            4008 => ErrorCode::OccupancyExceeded,
            4009 => ErrorCode::RatePlanNotApplicable,
            4010 => ErrorCode::CheckInOutsideStay,
            4011 => ErrorCode::RoomNotAssigned,
            4012 => ErrorCode::ReservationClosed,

            5001 => ErrorCode::FolioUnsettled,
            5002 => ErrorCode::ChargeNotFound,
            5003 => ErrorCode::ChargeAlreadyVoided,
            5004 => ErrorCode::InvalidAmount,
            5005 => ErrorCode::PaymentNotFound,

            6001 => ErrorCode::PropertyNotFound,
            6002 => ErrorCode::PropertyHasReservations,
            6101 => ErrorCode::RoomTypeNotFound,
            6102 => ErrorCode::RoomTypeNameExists,
            6103 => ErrorCode::RoomTypeInUse,
            6201 => ErrorCode::RoomNotFound,
            6202 => ErrorCode::RoomNumberExists,
            6203 => ErrorCode::RoomInUse,
            6204 => ErrorCode::RoomOutOfService,
            6301 => ErrorCode::RatePlanNotFound,

            7001 => ErrorCode::GuestNotFound,
            7002 => ErrorCode::GuestHasReservations,
            7101 => ErrorCode::OrderNotFound,
            7102 => ErrorCode::OrderEmpty,
            7201 => ErrorCode::ServiceRequestNotFound,
            7301 => ErrorCode::MessageNotFound,

            8001 => ErrorCode::UserNotFound,

            9001 => ErrorCode::InternalError,
            9002 => ErrorCode::DatabaseError,
            9005 => ErrorCode::ConfigError,

            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::LicenseExpired.code(), 3002);
        assert_eq!(ErrorCode::RoomUnavailable.code(), 4003);
        assert_eq!(ErrorCode::FolioUnsettled.code(), 5001);
        assert_eq!(ErrorCode::RoomNumberExists.code(), 6202);
        assert_eq!(ErrorCode::GuestNotFound.code(), 7001);
        assert_eq!(ErrorCode::UserNotFound.code(), 8001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(4004), Ok(ErrorCode::RoomTypeSoldOut));
        assert_eq!(ErrorCode::try_from(6301), Ok(ErrorCode::RatePlanNotFound));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(1234), Err(InvalidErrorCode(1234)));
    }

    #[test]
    fn test_try_from_covers_every_variant() {
        let all = [
            ErrorCode::Unknown,
            ErrorCode::InvalidReference,
            ErrorCode::TooManyRequests,
            ErrorCode::EmailExists,
            ErrorCode::CannotDeleteSelf,
            ErrorCode::AccountNotFound,
            ErrorCode::ReservationClosed,
            ErrorCode::InvalidAmount,
            ErrorCode::PaymentNotFound,
            ErrorCode::RoomOutOfService,
            ErrorCode::MessageNotFound,
            ErrorCode::ConfigError,
        ];
        for code in all {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&ErrorCode::ReservationNotFound).unwrap(),
            "4001"
        );
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("4003").unwrap();
        assert_eq!(code, ErrorCode::RoomUnavailable);

        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::LicenseExpired), "3002");
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::NotFound.message(), "Resource not found");
        assert_eq!(
            ErrorCode::InvalidStayDates.message(),
            "Check-out date must be after check-in date"
        );
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }

    #[test]
    fn test_invalid_error_code_display() {
        let err = InvalidErrorCode(999);
        assert_eq!(format!("{}", err), "invalid error code: 999");
    }
}
