//! Fixed-window rate limiting for login and registration

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::state::AppState;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone, Default)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(
        &self,
        route: &'static str,
        ip: &str,
        max_requests: u32,
        window_secs: u64,
    ) -> bool {
        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start).as_secs() >= window_secs {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= max_requests
    }

    /// Drop windows older than 5 minutes
    pub async fn cleanup(&self) {
        let mut map = self.inner.lock().await;
        let cutoff = std::time::Duration::from_secs(300);
        let now = Instant::now();

        for route_map in map.values_mut() {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < cutoff);
        }
        map.retain(|_, route_map| !route_map.is_empty());
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.inner.lock().await.values().map(HashMap::len).sum()
    }
}

/// Client IP: the peer address, or the first X-Forwarded-For entry when
/// the proxy in front is trusted to set it
fn extract_ip(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn limit(
    state: &AppState,
    route: &'static str,
    max_requests: u32,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip = extract_ip(&request, state.config.trust_proxy);
    if !state.rate_limiter.check(route, &ip, max_requests, 60).await {
        tracing::warn!(route, ip = %ip, "Rate limit exceeded");
        return Err(AppError::too_many_requests().into_response());
    }
    Ok(next.run(request).await)
}

/// Login: 5 requests/minute per IP
pub async fn login_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    limit(&state, "login", 5, request, next).await
}

/// Registration: 3 requests/minute per IP
pub async fn register_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    limit(&state, "register", 3, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ConnectInfo;
    use std::net::SocketAddr;

    #[tokio::test]
    async fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            assert!(limiter.check("login", "10.0.0.1", 5, 60).await);
        }
        assert!(!limiter.check("login", "10.0.0.1", 5, 60).await);
        // other IPs and routes are independent
        assert!(limiter.check("login", "10.0.0.2", 5, 60).await);
        assert!(limiter.check("register", "10.0.0.1", 5, 60).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = RateLimiter::new();
        assert!(limiter.check("login", "ip", 1, 60).await);
        assert!(!limiter.check("login", "ip", 1, 60).await);
        tokio::time::advance(std::time::Duration::from_secs(61)).await;
        assert!(limiter.check("login", "ip", 1, 60).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_drops_stale_entries() {
        let limiter = RateLimiter::new();
        limiter.check("login", "a", 5, 60).await;
        limiter.check("register", "b", 5, 60).await;
        assert_eq!(limiter.tracked().await, 2);

        tokio::time::advance(std::time::Duration::from_secs(301)).await;
        limiter.check("login", "c", 5, 60).await;
        limiter.cleanup().await;
        assert_eq!(limiter.tracked().await, 1);
    }

    fn from_peer(peer: &str, forwarded: Option<&str>) -> Request {
        let mut builder = Request::builder();
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut req = builder.body(axum::body::Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        req
    }

    #[test]
    fn test_forwarded_header_ignored_by_default() {
        let req = from_peer("198.51.100.7:40000", Some("203.0.113.9"));
        assert_eq!(extract_ip(&req, false), "198.51.100.7");

        // a spoofed header cannot buy a fresh window
        let other = from_peer("198.51.100.7:40001", Some("203.0.113.10"));
        assert_eq!(extract_ip(&other, false), extract_ip(&req, false));
    }

    #[test]
    fn test_forwarded_header_behind_trusted_proxy() {
        let req = from_peer("10.0.0.1:40000", Some("203.0.113.9, 10.0.0.1"));
        assert_eq!(extract_ip(&req, true), "203.0.113.9");

        let blank = from_peer("10.0.0.1:40000", Some(" "));
        assert_eq!(extract_ip(&blank, true), "10.0.0.1");

        let bare = Request::builder().body(axum::body::Body::empty()).unwrap();
        assert_eq!(extract_ip(&bare, true), "unknown");
        assert_eq!(extract_ip(&bare, false), "unknown");
    }
}
