//! Guest Routes
//!
//! Guests belong to the account, not to a property, so a returning guest
//! keeps one profile across every hotel of the group.

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get},
};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/guests", routes())
}

fn routes() -> Router<AppState> {
    let desk_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/reservations", get(handler::history));

    let manage_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .route_layer(middleware::from_fn(require_role(UserRole::Manager)));

    desk_routes.merge(manage_routes)
}
