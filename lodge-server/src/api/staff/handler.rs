//! Staff API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::json;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{StaffCreate, StaffUpdate, User, UserResponse, UserRole};
use shared::util::now_millis;

use crate::api::{ApiResult, ValidatedJson, audit};
use crate::auth::CurrentUser;
use crate::auth::password::{check_length, hash_for_storage};
use crate::db;
use crate::db::users::NewUser;
use crate::state::AppState;

fn role_of(user: &User) -> Result<UserRole, AppError> {
    user.role()
        .ok_or_else(|| AppError::internal(format!("user {} has unknown role {}", user.id, user.role)))
}

fn cannot_assign(role: UserRole) -> AppError {
    AppError::with_message(
        ErrorCode::PermissionDenied,
        format!("You cannot assign the {} role", role.as_db()),
    )
}

/// GET /api/staff
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Vec<UserResponse>> {
    let users = db::users::list(&state.pool, current.account_id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/staff
pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<StaffCreate>,
) -> ApiResult<UserResponse> {
    if !current.role.can_assign(req.role) {
        return Err(cannot_assign(req.role));
    }
    check_length(&req.password)?;
    let hashed = hash_for_storage(&req.password)?;

    let user = db::users::insert(
        &state.pool,
        &NewUser {
            account_id: current.account_id,
            username: req.username.trim(),
            email: req.email.trim(),
            hashed_password: &hashed,
            display_name: req.display_name.as_deref(),
            role: req.role,
        },
        now_millis(),
    )
    .await?;

    tracing::info!(account_id = current.account_id, user_id = user.id, role = %user.role, "Staff created");
    audit(
        &state,
        &current,
        "staff.created",
        json!({ "user_id": user.id, "username": user.username, "role": user.role }),
    )
    .await;
    Ok(Json(user.into()))
}

/// PATCH /api/staff/{id}
///
/// Owners may edit anyone but can never be demoted or disabled; managers
/// only edit staff and themselves.
pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<StaffUpdate>,
) -> ApiResult<UserResponse> {
    let target = db::users::find(&state.pool, current.account_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    let target_role = role_of(&target)?;
    let is_self = target.id == current.id;

    if target_role == UserRole::Owner && !is_self {
        return Err(AppError::new(ErrorCode::CannotModifyOwner));
    }
    if !current.is_owner() && target_role != UserRole::Staff && !is_self {
        return Err(AppError::new(ErrorCode::OwnerRequired));
    }
    if let Some(role) = req.role
        && role != target_role
    {
        if target_role == UserRole::Owner {
            return Err(AppError::new(ErrorCode::CannotModifyOwner));
        }
        if !current.role.can_assign(role) || is_self {
            return Err(cannot_assign(role));
        }
    }
    if req.is_active == Some(false) && (is_self || target_role == UserRole::Owner) {
        return Err(AppError::with_message(
            ErrorCode::CannotModifyOwner,
            "You cannot disable this account",
        ));
    }

    let hashed = match req.password.as_deref() {
        Some(password) => {
            check_length(password)?;
            Some(hash_for_storage(password)?)
        }
        None => None,
    };

    let user = db::users::update(
        &state.pool,
        current.account_id,
        id,
        req.display_name.as_deref(),
        req.role,
        req.is_active,
        hashed.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    audit(
        &state,
        &current,
        "staff.updated",
        json!({
            "user_id": user.id,
            "role": req.role.map(|r| r.as_db()),
            "is_active": req.is_active,
            "password_reset": hashed.is_some(),
        }),
    )
    .await;
    Ok(Json(user.into()))
}

/// DELETE /api/staff/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    if id == current.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }
    let target = db::users::find(&state.pool, current.account_id, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if role_of(&target)? == UserRole::Owner {
        return Err(AppError::new(ErrorCode::CannotModifyOwner));
    }

    if !db::users::delete(&state.pool, current.account_id, id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }

    tracing::info!(account_id = current.account_id, user_id = id, "Staff deleted");
    audit(
        &state,
        &current,
        "staff.deleted",
        json!({ "user_id": id, "username": target.username }),
    )
    .await;
    Ok(Json(ApiResponse::ok()))
}
