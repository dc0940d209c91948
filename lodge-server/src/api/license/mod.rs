//! License Routes
//!
//! Reachable with an expired license so an owner can renew.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/license", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new().route("/", get(handler::get));

    let owner_routes = Router::new()
        .route("/activate", post(handler::activate))
        .route_layer(middleware::from_fn(require_role(UserRole::Owner)));

    read_routes.merge(owner_routes)
}
