//! Account (tenant) operations

use shared::models::{License, RegisterRequest, User, UserRole};
use sqlx::{PgExecutor, PgPool};

use super::{licenses, users};
use crate::error::ServiceResult;

pub async fn find_name(pool: &PgPool, account_id: i64) -> ServiceResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT name FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(name,)| name))
}

async fn insert(conn: impl PgExecutor<'_>, name: &str, now: i64) -> ServiceResult<i64> {
    let (id,): (i64,) =
        sqlx::query_as("INSERT INTO accounts (name, created_at) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(now)
            .fetch_one(conn)
            .await?;
    Ok(id)
}

/// Create the account, its owner and a trial license in one transaction
pub async fn register(
    pool: &PgPool,
    req: &RegisterRequest,
    hashed_password: &str,
    trial_days: i64,
    now: i64,
) -> ServiceResult<(User, License)> {
    let mut tx = pool.begin().await?;

    let account_id = insert(&mut *tx, req.account_name.trim(), now).await?;
    let owner = users::insert(
        &mut *tx,
        &users::NewUser {
            account_id,
            username: req.username.trim(),
            email: req.email.trim(),
            hashed_password,
            display_name: req.display_name.as_deref(),
            role: UserRole::Owner,
        },
        now,
    )
    .await?;
    let license = licenses::insert_trial(&mut *tx, account_id, trial_days, now).await?;

    tx.commit().await?;
    Ok((owner, license))
}
