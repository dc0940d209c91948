//! Authentication and role middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserRole};

use super::session::{CurrentUser, SessionError, extract_token};
use crate::db;
use crate::state::AppState;

/// Require a valid session
///
/// Reads the token from `Authorization: Bearer` or the session cookie and
/// injects [`CurrentUser`] into the request extensions.
///
/// | failure          | error                   |
/// |------------------|-------------------------|
/// | no token         | 401 NotAuthenticated    |
/// | token expired    | 401 TokenExpired        |
/// | user gone or off | 401 AccountDisabled     |
/// | anything else    | 401 TokenInvalid        |
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let Some(token) = extract_token(req.headers()) else {
        tracing::debug!(uri = %req.uri(), "Missing session token");
        return Err(AppError::not_authenticated());
    };

    let claimed = state
        .sessions
        .validate(&token)
        .and_then(CurrentUser::try_from)
        .map_err(|e| {
            tracing::warn!(uri = %req.uri(), error = %e, "Session rejected");
            match e {
                SessionError::Expired => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid session token"),
            }
        })?;

    let row = db::users::find(&state.pool, claimed.account_id, claimed.id).await?;
    let user = live_user(claimed, row)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// The session's user as stored now
///
/// A deleted or deactivated user loses access immediately, and a role
/// change applies without waiting for the token to expire.
fn live_user(claimed: CurrentUser, row: Option<User>) -> Result<CurrentUser, AppError> {
    let Some(row) = row.filter(|u| u.is_active) else {
        tracing::warn!(user_id = claimed.id, "Session of a disabled or deleted user");
        return Err(AppError::new(ErrorCode::AccountDisabled));
    };
    let role = row.role().ok_or_else(|| {
        AppError::internal(format!("user {} has unknown role {:?}", row.id, row.role))
    })?;
    Ok(CurrentUser {
        username: row.username,
        role,
        ..claimed
    })
}

/// Require at least `role` (staff < manager < owner)
///
/// Must run after [`require_auth`].
///
/// ```ignore
/// Router::new()
///     .route("/api/staff", post(staff::create))
///     .route_layer(middleware::from_fn(require_role(UserRole::Manager)));
/// ```
pub fn require_role(
    role: UserRole,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;

            if !user.role.satisfies(role) {
                tracing::warn!(
                    user_id = user.id,
                    username = %user.username,
                    required = role.as_db(),
                    "Role check failed"
                );
                return Err(AppError::with_message(
                    ErrorCode::PermissionDenied,
                    format!("{} role is required", role.as_db()),
                ));
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claimed() -> CurrentUser {
        CurrentUser {
            id: 7,
            account_id: 3,
            username: "ada".into(),
            role: UserRole::Manager,
        }
    }

    fn row(is_active: bool, role: &str) -> User {
        User {
            id: 7,
            account_id: 3,
            username: "ada.l".into(),
            email: "ada@example.com".into(),
            hashed_password: String::new(),
            display_name: None,
            role: role.into(),
            is_active,
            created_at: 0,
            last_login_at: None,
        }
    }

    #[test]
    fn test_deleted_user_is_refused() {
        let err = live_user(claimed(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountDisabled);
    }

    #[test]
    fn test_deactivated_user_is_refused() {
        let err = live_user(claimed(), Some(row(false, "manager"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountDisabled);
    }

    #[test]
    fn test_stored_role_wins_over_token() {
        let user = live_user(claimed(), Some(row(true, "staff"))).unwrap();
        assert_eq!(user.role, UserRole::Staff);
        assert_eq!(user.username, "ada.l");
        assert_eq!((user.id, user.account_id), (7, 3));
    }
}
