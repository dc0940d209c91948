//! Audit Log Routes

mod handler;

use axum::{Router, middleware, routing::get};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/audit-log", get(handler::list))
        .route_layer(middleware::from_fn(require_role(UserRole::Manager)))
}
