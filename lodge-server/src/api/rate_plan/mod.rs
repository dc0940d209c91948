//! Rate Plan Routes

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/properties/{property_id}/rate-plans", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route_layer(middleware::from_fn(require_role(UserRole::Manager)));

    read_routes.merge(manage_routes)
}
