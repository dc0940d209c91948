//! Audit Log Model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AuditEntry {
    pub id: i64,
    pub account_id: i64,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub action: String,
    pub detail: Option<serde_json::Value>,
    pub created_at: i64,
}
