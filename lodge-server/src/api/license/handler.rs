//! License API Handlers

use axum::{
    Extension, Json,
    extract::State,
};
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{ActivateLicenseRequest, LicenseInfo};
use shared::util::{now_millis, today};

use crate::api::{ApiResult, ValidatedJson, audit};
use crate::auth::CurrentUser;
use crate::db;
use crate::license::{key, load_snapshot};
use crate::state::AppState;

async fn license_info(state: &AppState, account_id: i64) -> Result<LicenseInfo, AppError> {
    let snapshot = load_snapshot(state, account_id).await?;
    let properties = db::properties::count(&state.pool, account_id).await?;
    let rooms = db::rooms::count_for_account(&state.pool, account_id).await?;
    Ok(snapshot.info(now_millis(), properties, rooms))
}

/// GET /api/license
pub async fn get(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<LicenseInfo> {
    Ok(Json(license_info(&state, current.account_id).await?))
}

/// POST /api/license/activate - apply a signed license key
pub async fn activate(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    ValidatedJson(req): ValidatedJson<ActivateLicenseRequest>,
) -> ApiResult<LicenseInfo> {
    let account_id = current.account_id;
    let license = key::verify(
        &state.config.license_signing_secret,
        &req.key,
        account_id,
        today(),
    )?;
    let hash = key::key_hash(&req.key);

    let stored = db::licenses::find_by_account(&state.pool, account_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LicenseMissing))?;
    if stored.license_key_hash.as_deref() == Some(hash.as_str()) {
        tracing::debug!(account_id, "License key already applied");
        return Ok(Json(license_info(&state, account_id).await?));
    }

    db::licenses::activate(
        &state.pool,
        account_id,
        license.tier,
        license.expires_at(),
        &hash,
        now_millis(),
    )
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::LicenseMissing))?;
    state.license_cache.invalidate(account_id).await;

    tracing::info!(
        account_id,
        tier = license.tier.as_db(),
        expires_on = %license.expires_on,
        "License activated"
    );
    audit(
        &state,
        &current,
        "license.activated",
        json!({ "tier": license.tier.as_db(), "expires_on": license.expires_on }),
    )
    .await;

    Ok(Json(license_info(&state, account_id).await?))
}
