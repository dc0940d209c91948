//! Auth API Handlers

use axum::{
    Extension, Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    AuthResponse, ChangePasswordRequest, LicenseInfo, LoginRequest, RegisterRequest, User,
    UserResponse,
};
use shared::util::now_millis;

use crate::api::{ApiResult, ValidatedJson, audit, record};
use crate::auth::password::{check_length, hash_for_storage, verify_password};
use crate::auth::session::{clear_session_cookie, session_cookie};
use crate::auth::CurrentUser;
use crate::db;
use crate::license::load_snapshot;
use crate::state::AppState;

/// Issue a session for `user` as JSON body plus `Set-Cookie`
fn session_response(state: &AppState, user: User) -> Result<Response, AppError> {
    let issued = state.sessions.issue(&user).map_err(|e| {
        tracing::error!(error = %e, "Failed to issue session token");
        AppError::new(ErrorCode::InternalError)
    })?;

    let cookie = session_cookie(&issued.token, issued.max_age_secs, state.secure_cookies());
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| AppError::internal(e.to_string()))?,
    );

    let body = AuthResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: UserResponse::from(user),
    };
    Ok((headers, Json(body)).into_response())
}

/// POST /api/auth/register - new account, owner user and trial license
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<Response, AppError> {
    check_length(&req.password)?;
    let hashed = hash_for_storage(&req.password)?;
    let now = now_millis();

    let (user, license) =
        db::accounts::register(&state.pool, &req, &hashed, state.config.trial_days, now).await?;

    tracing::info!(
        account_id = user.account_id,
        user_id = user.id,
        trial_expires_at = license.expires_at,
        "Account registered"
    );
    record(
        &state,
        user.account_id,
        Some(user.id),
        "account.registered",
        Some(json!({ "username": user.username, "account_name": req.account_name })),
    )
    .await;

    session_response(&state, user)
}

/// POST /api/auth/login - username or email plus password
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Response, AppError> {
    let login = req.login.trim();
    let user = db::users::find_by_login(&state.pool, login).await?;

    // Same error for unknown user and wrong password
    let user = match user {
        Some(u) if verify_password(&req.password, &u.hashed_password) => u,
        _ => {
            tracing::warn!(login = %login, "Login failed");
            return Err(AppError::invalid_credentials());
        }
    };
    if !user.is_active {
        tracing::warn!(user_id = user.id, "Login refused for disabled account");
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let now = now_millis();
    db::users::record_login(&state.pool, user.id, now).await?;
    record(&state, user.account_id, Some(user.id), "user.login", None).await;

    tracing::info!(user_id = user.id, account_id = user.account_id, "User logged in");
    session_response(&state, user)
}

/// POST /api/auth/logout - drop the session cookie
pub async fn logout(State(state): State<AppState>) -> Result<Response, AppError> {
    let cookie = clear_session_cookie(state.secure_cookies());
    let value = HeaderValue::from_str(&cookie).map_err(|e| AppError::internal(e.to_string()))?;
    Ok(([(SET_COOKIE, value)], Json(ApiResponse::<()>::ok())).into_response())
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub account_name: String,
    pub license: LicenseInfo,
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<MeResponse> {
    let user = db::users::find(&state.pool, current.account_id, current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    let account_name = db::accounts::find_name(&state.pool, current.account_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::AccountNotFound))?;

    let snapshot = load_snapshot(&state, current.account_id).await?;
    let properties = db::properties::count(&state.pool, current.account_id).await?;
    let rooms = db::rooms::count_for_account(&state.pool, current.account_id).await?;

    Ok(Json(MeResponse {
        user: user.into(),
        account_name,
        license: snapshot.info(now_millis(), properties, rooms),
    }))
}

/// PUT /api/auth/password - change own password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<ApiResponse<()>> {
    let user = db::users::find(&state.pool, current.account_id, current.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if !verify_password(&req.current_password, &user.hashed_password) {
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Current password is incorrect",
        ));
    }
    check_length(&req.new_password)?;
    let hashed = hash_for_storage(&req.new_password)?;
    db::users::set_password(&state.pool, user.id, &hashed).await?;

    audit(&state, &current, "user.password_changed", json!({ "user_id": user.id })).await;
    Ok(Json(ApiResponse::ok()))
}
