//! User / Staff Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Staff role, ordered by privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Staff,
    Manager,
    Owner,
}

impl UserRole {
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Self::Owner),
            "manager" => Some(Self::Manager),
            "staff" => Some(Self::Staff),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Staff => 0,
            Self::Manager => 1,
            Self::Owner => 2,
        }
    }

    /// At least as privileged as `required`
    pub fn satisfies(&self, required: UserRole) -> bool {
        self.rank() >= required.rank()
    }

    /// Roles this role may hand out to new staff
    pub fn can_assign(&self, role: UserRole) -> bool {
        match self {
            Self::Owner => matches!(role, Self::Manager | Self::Staff),
            Self::Manager => role == Self::Staff,
            Self::Staff => false,
        }
    }
}

/// User row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub account_id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub display_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: i64,
    pub last_login_at: Option<i64>,
}

impl User {
    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_db(&self.role)
    }
}

/// User response (without password)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub account_id: i64,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            account_id: u.account_id,
            username: u.username,
            email: u.email,
            display_name: u.display_name,
            role: u.role,
            is_active: u.is_active,
            last_login_at: u.last_login_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 200, message = "Account name is required"))]
    pub account_name: String,
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: String,
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
}

/// Login with username or email
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username or email is required"))]
    pub login: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(max = 128, message = "Password is too long"))]
    pub new_password: String,
}

/// Session issued on login/register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: UserResponse,
}

/// Create staff payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StaffCreate {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "Email is not valid"))]
    pub email: String,
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: String,
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    pub role: UserRole,
}

/// Update staff payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StaffUpdate {
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    /// Password reset by a manager/owner
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: Option<String>,
}

pub const MIN_PASSWORD_LEN: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(UserRole::Owner.satisfies(UserRole::Manager));
        assert!(UserRole::Manager.satisfies(UserRole::Manager));
        assert!(UserRole::Manager.satisfies(UserRole::Staff));
        assert!(!UserRole::Staff.satisfies(UserRole::Manager));
        assert!(!UserRole::Manager.satisfies(UserRole::Owner));
    }

    #[test]
    fn test_role_assignment() {
        assert!(UserRole::Owner.can_assign(UserRole::Manager));
        assert!(UserRole::Owner.can_assign(UserRole::Staff));
        assert!(!UserRole::Owner.can_assign(UserRole::Owner));
        assert!(UserRole::Manager.can_assign(UserRole::Staff));
        assert!(!UserRole::Manager.can_assign(UserRole::Manager));
        assert!(!UserRole::Staff.can_assign(UserRole::Staff));
    }

    #[test]
    fn test_user_serialization_hides_password() {
        let user = User {
            id: 1,
            account_id: 1,
            username: "frontdesk".into(),
            email: "fd@example.com".into(),
            hashed_password: "$argon2id$secret".into(),
            display_name: None,
            role: "staff".into(),
            is_active: true,
            created_at: 0,
            last_login_at: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert_eq!(user.role(), Some(UserRole::Staff));
    }
}
