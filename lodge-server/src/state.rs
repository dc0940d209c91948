//! Application state

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use crate::BoxError;
use crate::auth::{RateLimiter, SessionKeys};
use crate::config::Config;
use crate::license::LicenseCache;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Session token signer/verifier
    pub sessions: SessionKeys,
    pub license_cache: LicenseCache,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect, run migrations and build the state
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        Ok(Self::from_pool(pool, config))
    }

    /// Build the state around an existing pool (no migrations)
    pub fn from_pool(pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            sessions: SessionKeys::new(&config.jwt_secret, config.session_ttl_hours),
            license_cache: LicenseCache::new(config.license_cache_ttl_secs),
            rate_limiter: RateLimiter::new(),
            config: Arc::new(config.clone()),
        }
    }

    /// Session cookies carry `Secure` outside development
    pub fn secure_cookies(&self) -> bool {
        !self.config.is_development()
    }
}
