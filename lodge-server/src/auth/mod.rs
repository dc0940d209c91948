//! Authentication: sessions, roles, password hashing, rate limiting

pub mod middleware;
pub mod password;
pub mod rate_limit;
pub mod session;

pub use middleware::{require_auth, require_role};
pub use rate_limit::RateLimiter;
pub use session::{CurrentUser, SessionKeys};
