//! Property Routes

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/properties", routes())
}

fn routes() -> Router<AppState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{property_id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/{property_id}", put(handler::update))
        .route_layer(middleware::from_fn(require_role(UserRole::Manager)));

    // Adding or removing a property changes what the account pays for
    let owner_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{property_id}", delete(handler::delete))
        .route_layer(middleware::from_fn(require_role(UserRole::Owner)));

    read_routes.merge(manage_routes).merge(owner_routes)
}
