//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::AccountNotFound
            | Self::ReservationNotFound
            | Self::ChargeNotFound
            | Self::PaymentNotFound
            | Self::PropertyNotFound
            | Self::RoomTypeNotFound
            | Self::RoomNotFound
            | Self::RatePlanNotFound
            | Self::GuestNotFound
            | Self::OrderNotFound
            | Self::ServiceRequestNotFound
            | Self::MessageNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::UsernameExists
            | Self::EmailExists
            | Self::RoomUnavailable
            | Self::RoomTypeSoldOut
            | Self::InvalidStatusTransition
            | Self::ReservationInProgress
            | Self::ReservationNotInHouse
            | Self::ReservationClosed
            | Self::FolioUnsettled
            | Self::ChargeAlreadyVoided
            | Self::PropertyHasReservations
            | Self::RoomTypeNameExists
            | Self::RoomTypeInUse
            | Self::RoomNumberExists
            | Self::RoomInUse
            | Self::RoomOutOfService
            | Self::GuestHasReservations => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::OwnerRequired
            | Self::ManagerRequired
            | Self::CannotModifyOwner
            | Self::CannotDeleteSelf
            | Self::LicenseMissing
            | Self::LicenseExpired
            | Self::FeatureNotAvailable
            | Self::PropertyLimitReached
            | Self::RoomLimitReached => StatusCode::FORBIDDEN,

            // 429 Too Many Requests
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::ReservationNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::GuestNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::RoomUnavailable.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::RoomTypeSoldOut.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::FolioUnsettled.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::RoomNumberExists.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::AccountDisabled.http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_forbidden_status() {
        assert_eq!(
            ErrorCode::LicenseExpired.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::FeatureNotAvailable.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::ManagerRequired.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidStayDates.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::LicenseKeyInvalid.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::OrderEmpty.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_and_rate_limit_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::TooManyRequests.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
