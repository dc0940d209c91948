//! Room Routes
//!
//! Housekeeping status changes are open to all staff; the rest of the
//! write surface needs a manager.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/properties/{property_id}/rooms", routes())
}

fn routes() -> Router<AppState> {
    let staff_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::set_status));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn(require_role(UserRole::Manager)));

    staff_routes.merge(manage_routes)
}
