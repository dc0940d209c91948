//! HTTP API
//!
//! # Structure
//!
//! - [`health`] - liveness check (public)
//! - [`auth`] - register, login, logout, current user, password (public/session)
//! - [`license`] - license summary and key activation (session)
//! - [`staff`] - staff accounts
//! - [`property`], [`room_type`], [`room`], [`rate_plan`] - inventory
//! - [`guest`] - guest profiles and stay history
//! - [`availability`], [`reservation`] - booking and the stay lifecycle
//! - [`room_service`], [`message`], [`folio`] - in-house services and billing
//! - [`dashboard`], [`insights`], [`audit`] - reporting
//!
//! Everything except health/auth/license runs behind `require_auth` and
//! `license_gate`; write routes add a `require_role` layer.

pub mod audit;
pub mod auth;
pub mod availability;
pub mod dashboard;
pub mod folio;
pub mod guest;
pub mod health;
pub mod insights;
pub mod license;
pub mod message;
pub mod property;
pub mod rate_plan;
pub mod reservation;
pub mod room;
pub mod room_service;
pub mod room_type;
pub mod staff;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, OptionalFromRequest, Request};
use axum::{Json, Router, middleware};
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};
use shared::models::{Property, Reservation};
use validator::Validate;

use crate::auth::{CurrentUser, require_auth};
use crate::db;
use crate::license::license_gate;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Build the router with every route registered
pub fn create_router(state: AppState) -> Router {
    // Session only: must stay reachable with an expired license
    let session = Router::new()
        .merge(auth::session_router())
        .merge(license::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let business = Router::new()
        .merge(staff::router())
        .merge(property::router())
        .merge(room_type::router())
        .merge(room::router())
        .merge(rate_plan::router())
        .merge(guest::router())
        .merge(availability::router())
        .merge(reservation::router())
        .merge(room_service::router())
        .merge(message::router())
        .merge(folio::router())
        .merge(dashboard::router())
        .merge(insights::router())
        .merge(audit::router())
        // layers run bottom-up: auth first, then the license gate
        .route_layer(middleware::from_fn_with_state(state.clone(), license_gate))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(health::router())
        .merge(auth::public_router(&state))
        .merge(session)
        .merge(business)
        .with_state(state)
}

/// JSON body that is deserialized and validated
///
/// Malformed or incomplete bodies and validation failures all become
/// 400 responses in the standard error envelope.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Absent body (no JSON content type) extracts as `None`
impl<S, T> OptionalFromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let json = <Json<T> as OptionalFromRequest<S>>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        match json {
            Some(Json(value)) => {
                value.validate()?;
                Ok(Some(Self(value)))
            }
            None => Ok(None),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let code = match &rejection {
        JsonRejection::JsonDataError(_) => ErrorCode::ValidationFailed,
        JsonRejection::JsonSyntaxError(_) => ErrorCode::InvalidFormat,
        _ => ErrorCode::InvalidRequest,
    };
    AppError::with_message(code, rejection.body_text())
}

/// Property owned by the caller's account, or 404
pub async fn verify_property(
    state: &AppState,
    user: &CurrentUser,
    property_id: i64,
) -> Result<Property, AppError> {
    db::properties::find(&state.pool, user.account_id, property_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PropertyNotFound))
}

/// Reservation of a property already checked with [`verify_property`], or 404
pub async fn find_reservation(
    state: &AppState,
    property_id: i64,
    reservation_id: i64,
) -> Result<Reservation, AppError> {
    db::reservations::find(&state.pool, property_id, reservation_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))
}

/// Best-effort audit entry for the current user
pub async fn audit(
    state: &AppState,
    user: &CurrentUser,
    action: &str,
    detail: serde_json::Value,
) {
    record(state, user.account_id, Some(user.id), action, Some(detail)).await;
}

/// Write an audit entry; failures are logged, never surfaced
pub async fn record(
    state: &AppState,
    account_id: i64,
    user_id: Option<i64>,
    action: &str,
    detail: Option<serde_json::Value>,
) {
    let now = shared::util::now_millis();
    if let Err(e) =
        db::audit::log(&state.pool, account_id, user_id, action, detail.as_ref(), now).await
    {
        let e: AppError = e.into();
        tracing::warn!(action, account_id, error = %e, "Failed to write audit log");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use shared::models::GuestCreate;

    async fn extract(body: &str, content_type: Option<&str>) -> Result<GuestCreate, AppError> {
        let mut builder = http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body.to_owned())).unwrap();
        <ValidatedJson<GuestCreate> as FromRequest<()>>::from_request(req, &())
            .await
            .map(|ValidatedJson(v)| v)
    }

    #[tokio::test]
    async fn test_valid_body() {
        let guest = extract(r#"{"first_name":"Ada","last_name":"Lovelace"}"#, Some("application/json"))
            .await
            .unwrap();
        assert_eq!(guest.last_name, "Lovelace");
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let err = extract(r#"{"first_name":"Ada"}"#, Some("application/json"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
        assert!(err.message.contains("last_name"));
    }

    #[tokio::test]
    async fn test_validation_message_is_surfaced() {
        let err = extract(r#"{"first_name":"Ada","last_name":""}"#, Some("application/json"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, "Last name is required");
    }

    #[tokio::test]
    async fn test_optional_body() {
        let req = http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::empty())
            .unwrap();
        let extracted =
            <ValidatedJson<GuestCreate> as OptionalFromRequest<()>>::from_request(req, &())
                .await
                .unwrap();
        assert!(extracted.is_none());
    }

    #[tokio::test]
    async fn test_syntax_and_content_type_errors() {
        let err = extract("{not json", Some("application/json")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);

        let err = extract(r#"{"first_name":"Ada","last_name":"L"}"#, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
