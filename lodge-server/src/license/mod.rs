//! Subscription licensing
//!
//! Every account has one license row. Business routes sit behind
//! [`license_gate`], which evaluates the license against the clock, rejects
//! missing or expired licenses and injects a [`LicenseSnapshot`] for quota
//! and feature checks further down.

pub mod key;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{License, LicenseInfo, LicenseStatus, LicenseTier};
use shared::util::now_millis;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;

const DAY_MILLIS: i64 = 86_400_000;

/// Status as of `now`: a trial or active license past its expiry is expired
pub fn effective_status(stored: LicenseStatus, expires_at: i64, now: i64) -> LicenseStatus {
    match stored {
        LicenseStatus::Expired => LicenseStatus::Expired,
        _ if now >= expires_at => LicenseStatus::Expired,
        other => other,
    }
}

/// License evaluated at a point in time
#[derive(Debug, Clone)]
pub struct LicenseSnapshot {
    pub account_id: i64,
    pub tier: LicenseTier,
    pub status: LicenseStatus,
    /// Status stored in the row, before evaluation
    pub stored_status: LicenseStatus,
    pub max_properties: i32,
    pub max_rooms: i32,
    pub features: Vec<String>,
    pub starts_at: i64,
    pub expires_at: i64,
}

impl LicenseSnapshot {
    pub fn evaluate(row: &License, now: i64) -> Result<Self, AppError> {
        let corrupt = || {
            AppError::internal(format!(
                "license {} has tier {:?} / status {:?}",
                row.id, row.tier, row.status
            ))
        };
        let tier = LicenseTier::from_db(&row.tier).ok_or_else(corrupt)?;
        let stored_status = LicenseStatus::from_db(&row.status).ok_or_else(corrupt)?;
        Ok(Self {
            account_id: row.account_id,
            tier,
            status: effective_status(stored_status, row.expires_at, now),
            stored_status,
            max_properties: row.max_properties,
            max_rooms: row.max_rooms,
            features: row.features.clone(),
            starts_at: row.starts_at,
            expires_at: row.expires_at,
        })
    }

    pub fn is_expired(&self) -> bool {
        self.status == LicenseStatus::Expired
    }

    /// Expired by the clock but not yet recorded as such
    pub fn needs_expiry_update(&self) -> bool {
        self.is_expired() && self.stored_status != LicenseStatus::Expired
    }

    pub fn can_use(&self, feature: &str) -> bool {
        !self.is_expired() && self.features.iter().any(|f| f == feature)
    }

    pub fn require_feature(&self, feature: &str) -> Result<(), AppError> {
        if self.can_use(feature) {
            return Ok(());
        }
        Err(AppError::with_message(
            ErrorCode::FeatureNotAvailable,
            format!("Feature '{feature}' is not included in the {} license", self.tier.as_db()),
        )
        .with_detail("feature", feature))
    }

    /// Whole days left, rounded up; 0 once expired
    pub fn days_remaining(&self, now: i64) -> i64 {
        if self.is_expired() || now >= self.expires_at {
            return 0;
        }
        (self.expires_at - now + DAY_MILLIS - 1) / DAY_MILLIS
    }

    /// Room for one more property given `used`
    pub fn check_property_quota(&self, used: i64) -> Result<(), AppError> {
        if used >= i64::from(self.max_properties) {
            return Err(AppError::new(ErrorCode::PropertyLimitReached)
                .with_detail("max_properties", self.max_properties));
        }
        Ok(())
    }

    /// Room for one more room given `used` across the account
    pub fn check_room_quota(&self, used: i64) -> Result<(), AppError> {
        if used >= i64::from(self.max_rooms) {
            return Err(
                AppError::new(ErrorCode::RoomLimitReached).with_detail("max_rooms", self.max_rooms)
            );
        }
        Ok(())
    }

    pub fn info(&self, now: i64, properties_used: i64, rooms_used: i64) -> LicenseInfo {
        LicenseInfo {
            tier: self.tier,
            status: self.status,
            max_properties: self.max_properties,
            max_rooms: self.max_rooms,
            features: self.features.clone(),
            starts_at: self.starts_at,
            expires_at: self.expires_at,
            days_remaining: self.days_remaining(now),
            properties_used,
            rooms_used,
        }
    }
}

struct CacheEntry {
    license: License,
    expires_at: Instant,
}

/// Per-account license rows, cached for a short TTL
#[derive(Clone)]
pub struct LicenseCache {
    entries: Arc<RwLock<HashMap<i64, CacheEntry>>>,
    ttl: Duration,
}

impl LicenseCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub async fn get(&self, account_id: i64) -> Option<License> {
        let entries = self.entries.read().await;
        entries
            .get(&account_id)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.license.clone())
    }

    pub async fn insert(&self, license: License) {
        let mut entries = self.entries.write().await;
        entries.insert(
            license.account_id,
            CacheEntry {
                license,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    pub async fn invalidate(&self, account_id: i64) {
        self.entries.write().await.remove(&account_id);
    }
}

/// Load the account's license, from cache when fresh, and evaluate it now
///
/// Persists the expired status the first time the clock passes `expires_at`.
pub async fn load_snapshot(state: &AppState, account_id: i64) -> Result<LicenseSnapshot, AppError> {
    let license = match state.license_cache.get(account_id).await {
        Some(license) => license,
        None => {
            let license = db::licenses::find_by_account(&state.pool, account_id)
                .await?
                .ok_or_else(|| AppError::new(ErrorCode::LicenseMissing))?;
            state.license_cache.insert(license.clone()).await;
            license
        }
    };

    let snapshot = LicenseSnapshot::evaluate(&license, now_millis())?;
    if snapshot.needs_expiry_update() {
        tracing::info!(account_id, tier = snapshot.tier.as_db(), "License expired");
        db::licenses::mark_expired(&state.pool, license.id).await?;
        state.license_cache.invalidate(account_id).await;
    }
    Ok(snapshot)
}

/// Reject requests from accounts without a usable license
///
/// Must run after `require_auth`.
pub async fn license_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or_else(AppError::not_authenticated)?;

    let snapshot = load_snapshot(&state, user.account_id).await?;
    if snapshot.is_expired() {
        tracing::warn!(account_id = user.account_id, "Request blocked by expired license");
        return Err(AppError::new(ErrorCode::LicenseExpired)
            .with_detail("expires_at", snapshot.expires_at));
    }

    request.extensions_mut().insert(snapshot);
    Ok(next.run(request).await)
}
