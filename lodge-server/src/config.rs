//! Server configuration

use crate::BoxError;

/// Server configuration, loaded from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for session tokens
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    /// HMAC secret for license keys
    pub license_signing_secret: String,
    pub trial_days: i64,
    pub db_max_connections: u32,
    pub license_cache_ttl_secs: u64,
    /// Allowed CORS origin; permissive when unset
    pub cors_allow_origin: Option<String>,
    /// Take the client IP from X-Forwarded-For; only behind a proxy that sets it
    pub trust_proxy: bool,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    pub fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: env_parse("HTTP_PORT", 8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            session_ttl_hours: env_parse("SESSION_TTL_HOURS", 24),
            license_signing_secret: Self::require_secret("LICENSE_SIGNING_SECRET", &environment)?,
            trial_days: env_parse("TRIAL_DAYS", 14),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 10),
            license_cache_ttl_secs: env_parse("LICENSE_CACHE_TTL_SECS", 60),
            cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN")
                .ok()
                .filter(|s| !s.is_empty()),
            trust_proxy: env_parse("TRUST_PROXY", false),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Configuration for tests and tooling; never reads the environment
    pub fn for_tests(database_url: &str) -> Self {
        Self {
            database_url: database_url.to_string(),
            http_port: 0,
            environment: "development".into(),
            jwt_secret: "test-jwt-secret".into(),
            session_ttl_hours: 24,
            license_signing_secret: "test-license-secret".into(),
            trial_days: 14,
            db_max_connections: 1,
            license_cache_ttl_secs: 60,
            cors_allow_origin: None,
            trust_proxy: false,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
