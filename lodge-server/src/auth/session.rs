//! Session tokens
//!
//! Sessions are HS256 JWTs carried either in `Authorization: Bearer <token>`
//! or in the `lodge_session` cookie set at login.

use chrono::{Duration, Utc};
use http::HeaderMap;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::{User, UserRole};
use thiserror::Error;

pub const SESSION_COOKIE: &str = "lodge_session";

/// Claims stored in the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub account_id: i64,
    pub username: String,
    pub role: String,
    /// Expiration (Unix seconds)
    pub exp: i64,
    /// Issued at (Unix seconds)
    pub iat: i64,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("session token has expired")]
    Expired,
    #[error("invalid session token: {0}")]
    Invalid(String),
    #[error("failed to sign session token: {0}")]
    Signing(String),
}

/// Issued token and its expiry (Unix millis)
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
    pub max_age_secs: i64,
}

/// Signs and verifies session tokens
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.max(1)),
        }
    }

    pub fn issue(&self, user: &User) -> Result<IssuedToken, SessionError> {
        let now = Utc::now();
        let expires = now + self.ttl;
        let claims = Claims {
            sub: user.id.to_string(),
            account_id: user.account_id,
            username: user.username.clone(),
            role: user.role.clone(),
            exp: expires.timestamp(),
            iat: now.timestamp(),
        };
        let token = self.sign(&claims)?;
        Ok(IssuedToken {
            token,
            expires_at: expires.timestamp_millis(),
            max_age_secs: self.ttl.num_seconds(),
        })
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, SessionError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid(e.to_string()),
            })
    }
}

/// Authenticated user, injected into request extensions by `require_auth`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub account_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = SessionError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| SessionError::Invalid("sub is not a user id".into()))?;
        let role = UserRole::from_db(&claims.role)
            .ok_or_else(|| SessionError::Invalid(format!("unknown role {}", claims.role)))?;
        Ok(Self {
            id,
            account_id: claims.account_id,
            username: claims.username,
            role,
        })
    }
}

impl CurrentUser {
    pub fn is_owner(&self) -> bool {
        self.role == UserRole::Owner
    }

    pub fn is_manager(&self) -> bool {
        self.role.satisfies(UserRole::Manager)
    }
}

/// Token from `Authorization: Bearer` first, then the session cookie
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| cookie_value(v, SESSION_COOKIE))
        .map(str::to_string)
}

/// Find `name` in a `Cookie` header value (`a=1; b=2`)
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name && !v.is_empty()).then_some(v)
    })
}

/// `Set-Cookie` value for a new session
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 42,
            account_id: 7,
            username: "maria".into(),
            email: "maria@example.com".into(),
            hashed_password: String::new(),
            display_name: None,
            role: "manager".into(),
            is_active: true,
            created_at: 0,
            last_login_at: None,
        }
    }

    #[test]
    fn test_issue_and_validate() {
        let keys = SessionKeys::new("secret", 24);
        let issued = keys.issue(&user()).unwrap();
        assert_eq!(issued.max_age_secs, 24 * 3600);

        let claims = keys.validate(&issued.token).unwrap();
        let current = CurrentUser::try_from(claims).unwrap();
        assert_eq!(current.id, 42);
        assert_eq!(current.account_id, 7);
        assert_eq!(current.role, UserRole::Manager);
        assert!(current.is_manager());
        assert!(!current.is_owner());
    }

    #[test]
    fn test_expired_token() {
        let keys = SessionKeys::new("secret", 24);
        let now = Utc::now().timestamp();
        let token = keys
            .sign(&Claims {
                sub: "1".into(),
                account_id: 1,
                username: "old".into(),
                role: "staff".into(),
                exp: now - 3600,
                iat: now - 7200,
            })
            .unwrap();
        assert_eq!(keys.validate(&token).unwrap_err(), SessionError::Expired);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issued = SessionKeys::new("secret-a", 1).issue(&user()).unwrap();
        let err = SessionKeys::new("secret-b", 1)
            .validate(&issued.token)
            .unwrap_err();
        assert!(matches!(err, SessionError::Invalid(_)));
        assert!(matches!(
            SessionKeys::new("secret-a", 1).validate("garbage"),
            Err(SessionError::Invalid(_))
        ));
    }

    #[test]
    fn test_cookie_value() {
        let header = "theme=dark; lodge_session=abc.def.ghi; lang=en";
        assert_eq!(cookie_value(header, "lodge_session"), Some("abc.def.ghi"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("lodge_session=", "lodge_session"), None);
    }

    #[test]
    fn test_extract_token_prefers_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::COOKIE, "lodge_session=from-cookie".parse().unwrap());
        assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));

        headers.insert(
            http::header::AUTHORIZATION,
            "Bearer from-header".parse().unwrap(),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));

        assert_eq!(extract_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 86400, true);
        assert_eq!(
            cookie,
            "lodge_session=tok; HttpOnly; SameSite=Lax; Path=/; Max-Age=86400; Secure"
        );
        let cleared = clear_session_cookie(false);
        assert!(cleared.starts_with("lodge_session=;"));
        assert!(cleared.contains("Max-Age=0"));
        assert!(!cleared.contains("Secure"));
    }
}
