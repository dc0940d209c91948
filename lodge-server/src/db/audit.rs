//! Audit log operations

use shared::models::AuditEntry;
use sqlx::PgPool;

use crate::error::ServiceResult;

/// Write an audit log entry
pub async fn log(
    pool: &PgPool,
    account_id: i64,
    user_id: Option<i64>,
    action: &str,
    detail: Option<&serde_json::Value>,
    now: i64,
) -> ServiceResult<()> {
    sqlx::query(
        "INSERT INTO audit_logs (account_id, user_id, action, detail, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(account_id)
    .bind(user_id)
    .bind(action)
    .bind(detail)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Newest first, with the acting user's name
pub async fn query(
    pool: &PgPool,
    account_id: i64,
    limit: i64,
    offset: i64,
) -> ServiceResult<(Vec<AuditEntry>, i64)> {
    let rows = sqlx::query_as::<_, AuditEntry>(
        r#"
        SELECT a.id, a.account_id, a.user_id, u.username, a.action, a.detail, a.created_at
        FROM audit_logs a
        LEFT JOIN users u ON u.id = a.user_id
        WHERE a.account_id = $1
        ORDER BY a.created_at DESC, a.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(account_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM audit_logs WHERE account_id = $1")
        .bind(account_id)
        .fetch_one(pool)
        .await?;
    Ok((rows, total))
}
