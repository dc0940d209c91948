//! Audit Log API Handlers

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use shared::models::AuditEntry;
use shared::request::{Page, PaginationQuery};

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db;
use crate::state::AppState;

/// GET /api/audit-log?page&per_page - newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<PaginationQuery>,
) -> ApiResult<Page<AuditEntry>> {
    let (entries, total) =
        db::audit::query(&state.pool, current.account_id, query.limit(), query.offset()).await?;
    Ok(Json(Page::new(entries, total, &query)))
}
