//! User / staff operations

use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserRole};
use sqlx::{PgExecutor, PgPool};

use crate::error::{ServiceError, ServiceResult};

pub struct NewUser<'a> {
    pub account_id: i64,
    pub username: &'a str,
    pub email: &'a str,
    pub hashed_password: &'a str,
    pub display_name: Option<&'a str>,
    pub role: UserRole,
}

/// Unique violations on `users` name the offending column in the constraint
fn user_conflict(e: ServiceError) -> ServiceError {
    match e {
        ServiceError::App(err) if err.code == ErrorCode::AlreadyExists => {
            let on_email = err
                .details
                .as_ref()
                .and_then(|d| d.get("constraint"))
                .and_then(|c| c.as_str())
                .is_some_and(|c| c.contains("email"));
            let code = if on_email {
                ErrorCode::EmailExists
            } else {
                ErrorCode::UsernameExists
            };
            ServiceError::App(AppError::new(code))
        }
        other => other,
    }
}

pub async fn insert(conn: impl PgExecutor<'_>, user: &NewUser<'_>, now: i64) -> ServiceResult<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (account_id, username, email, hashed_password, display_name, role, is_active, created_at)
        VALUES ($1, $2, lower($3), $4, $5, $6, TRUE, $7)
        RETURNING *
        "#,
    )
    .bind(user.account_id)
    .bind(user.username)
    .bind(user.email)
    .bind(user.hashed_password)
    .bind(user.display_name)
    .bind(user.role.as_db())
    .bind(now)
    .fetch_one(conn)
    .await
    .map_err(|e| user_conflict(e.into()))
}

/// Look up by username or (case-insensitive) email
pub async fn find_by_login(pool: &PgPool, login: &str) -> ServiceResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE username = $1 OR email = lower($1) LIMIT 1",
    )
    .bind(login.trim())
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find(pool: &PgPool, account_id: i64, id: i64) -> ServiceResult<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND account_id = $2")
        .bind(id)
        .bind(account_id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn list(pool: &PgPool, account_id: i64) -> ServiceResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT * FROM users
        WHERE account_id = $1
        ORDER BY CASE role WHEN 'owner' THEN 0 WHEN 'manager' THEN 1 ELSE 2 END, username
        "#,
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Partial update; `None` keeps the current value
pub async fn update(
    pool: &PgPool,
    account_id: i64,
    id: i64,
    display_name: Option<&str>,
    role: Option<UserRole>,
    is_active: Option<bool>,
    hashed_password: Option<&str>,
) -> ServiceResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            display_name = COALESCE($3, display_name),
            role = COALESCE($4, role),
            is_active = COALESCE($5, is_active),
            hashed_password = COALESCE($6, hashed_password)
        WHERE id = $1 AND account_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(account_id)
    .bind(display_name)
    .bind(role.map(|r| r.as_db()))
    .bind(is_active)
    .bind(hashed_password)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn set_password(pool: &PgPool, id: i64, hashed_password: &str) -> ServiceResult<()> {
    sqlx::query("UPDATE users SET hashed_password = $1 WHERE id = $2")
        .bind(hashed_password)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn record_login(pool: &PgPool, id: i64, now: i64) -> ServiceResult<()> {
    sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &PgPool, account_id: i64, id: i64) -> ServiceResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1 AND account_id = $2")
        .bind(id)
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_conflict_picks_column() {
        let email = ServiceError::App(
            AppError::new(ErrorCode::AlreadyExists).with_detail("constraint", "users_email_key"),
        );
        let err: AppError = user_conflict(email).into();
        assert_eq!(err.code, ErrorCode::EmailExists);

        let username = ServiceError::App(
            AppError::new(ErrorCode::AlreadyExists).with_detail("constraint", "users_username_key"),
        );
        let err: AppError = user_conflict(username).into();
        assert_eq!(err.code, ErrorCode::UsernameExists);
    }
}
