//! License rows

use shared::models::{License, LicenseStatus, LicenseTier};
use sqlx::{PgExecutor, PgPool};

use crate::error::ServiceResult;

const DAY_MILLIS: i64 = 86_400_000;

pub async fn find_by_account(pool: &PgPool, account_id: i64) -> ServiceResult<Option<License>> {
    let license = sqlx::query_as::<_, License>("SELECT * FROM licenses WHERE account_id = $1")
        .bind(account_id)
        .fetch_optional(pool)
        .await?;
    Ok(license)
}

/// Row lock on the account's license
///
/// Quota counts and the inserts they admit run under this lock, so two
/// concurrent creates cannot both see the last free slot.
pub async fn lock(conn: impl PgExecutor<'_>, account_id: i64) -> ServiceResult<()> {
    sqlx::query("SELECT id FROM licenses WHERE account_id = $1 FOR UPDATE")
        .bind(account_id)
        .fetch_optional(conn)
        .await?;
    Ok(())
}

/// Trial license for a new account
pub async fn insert_trial(
    conn: impl PgExecutor<'_>,
    account_id: i64,
    trial_days: i64,
    now: i64,
) -> ServiceResult<License> {
    let tier = LicenseTier::Trial;
    let license = sqlx::query_as::<_, License>(
        r#"
        INSERT INTO licenses (account_id, tier, status, max_properties, max_rooms, features, starts_at, expires_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $7)
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(tier.as_db())
    .bind(LicenseStatus::Trial.as_db())
    .bind(tier.max_properties())
    .bind(tier.max_rooms())
    .bind(tier.features())
    .bind(now)
    .bind(now + trial_days.max(1) * DAY_MILLIS)
    .fetch_one(conn)
    .await?;
    Ok(license)
}

pub async fn mark_expired(pool: &PgPool, id: i64) -> ServiceResult<()> {
    sqlx::query("UPDATE licenses SET status = 'expired', updated_at = $2 WHERE id = $1 AND status <> 'expired'")
        .bind(id)
        .bind(shared::util::now_millis())
        .execute(pool)
        .await?;
    Ok(())
}

/// Apply an activated key: tier quotas, active status and new expiry
pub async fn activate(
    pool: &PgPool,
    account_id: i64,
    tier: LicenseTier,
    expires_at: i64,
    key_hash: &str,
    now: i64,
) -> ServiceResult<Option<License>> {
    let license = sqlx::query_as::<_, License>(
        r#"
        UPDATE licenses SET
            tier = $2,
            status = $3,
            max_properties = $4,
            max_rooms = $5,
            features = $6,
            starts_at = $7,
            expires_at = $8,
            license_key_hash = $9,
            updated_at = $7
        WHERE account_id = $1
        RETURNING *
        "#,
    )
    .bind(account_id)
    .bind(tier.as_db())
    .bind(LicenseStatus::Active.as_db())
    .bind(tier.max_properties())
    .bind(tier.max_rooms())
    .bind(tier.features())
    .bind(now)
    .bind(expires_at)
    .bind(key_hash)
    .fetch_optional(pool)
    .await?;
    Ok(license)
}
