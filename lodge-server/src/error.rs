//! Service-layer error type
//!
//! `ServiceError` sits between the storage layer (`sqlx::Error`, `BoxError`)
//! and the API layer (`AppError`), so handlers can use `?` on both.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::BoxError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const EXCLUSION_VIOLATION: &str = "23P01";
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// - `Db`: database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db_err) = e.as_database_error()
            && let Some(code) = constraint_error_code(db_err.code().as_deref())
        {
            tracing::debug!(error = %db_err, "Constraint violation");
            let mut err = AppError::new(code);
            if let Some(constraint) = db_err.constraint() {
                err = err.with_detail("constraint", constraint);
            }
            return ServiceError::App(err);
        }
        ServiceError::Db(e.into())
    }
}

/// Map a SQLSTATE to the client-facing error code
fn constraint_error_code(sqlstate: Option<&str>) -> Option<ErrorCode> {
    match sqlstate? {
        UNIQUE_VIOLATION => Some(ErrorCode::AlreadyExists),
        FOREIGN_KEY_VIOLATION => Some(ErrorCode::InvalidReference),
        CHECK_VIOLATION => Some(ErrorCode::ValidationFailed),
        EXCLUSION_VIOLATION => Some(ErrorCode::RoomUnavailable),
        NUMERIC_OUT_OF_RANGE => Some(ErrorCode::ValueOutOfRange),
        _ => None,
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ErrorCode> for ServiceError {
    fn from(code: ErrorCode) -> Self {
        ServiceError::App(AppError::new(code))
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rewrite a generic unique-violation into a domain code
///
/// `AlreadyExists` from the constraint mapping is replaced with `code`;
/// every other error passes through.
pub fn on_conflict(code: ErrorCode) -> impl FnOnce(ServiceError) -> ServiceError {
    move |e| match e {
        ServiceError::App(err) if err.code == ErrorCode::AlreadyExists => {
            let mut mapped = AppError::new(code);
            mapped.details = err.details;
            ServiceError::App(mapped)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlstate_mapping() {
        assert_eq!(
            constraint_error_code(Some("23505")),
            Some(ErrorCode::AlreadyExists)
        );
        assert_eq!(
            constraint_error_code(Some("23503")),
            Some(ErrorCode::InvalidReference)
        );
        assert_eq!(
            constraint_error_code(Some("23P01")),
            Some(ErrorCode::RoomUnavailable)
        );
        assert_eq!(
            constraint_error_code(Some("22003")),
            Some(ErrorCode::ValueOutOfRange)
        );
        assert_eq!(constraint_error_code(Some("40001")), None);
        assert_eq!(constraint_error_code(None), None);
    }

    #[test]
    fn test_db_error_becomes_internal() {
        let err: AppError = ServiceError::Db("connection reset".into()).into();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[test]
    fn test_on_conflict_rewrites_only_already_exists() {
        let mapped = on_conflict(ErrorCode::RoomNumberExists)(ServiceError::App(AppError::new(
            ErrorCode::AlreadyExists,
        )));
        let err: AppError = mapped.into();
        assert_eq!(err.code, ErrorCode::RoomNumberExists);

        let untouched = on_conflict(ErrorCode::RoomNumberExists)(ServiceError::App(
            AppError::new(ErrorCode::InvalidReference),
        ));
        let err: AppError = untouched.into();
        assert_eq!(err.code, ErrorCode::InvalidReference);
    }
}
