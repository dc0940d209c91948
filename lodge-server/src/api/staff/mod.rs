//! Staff Routes
//!
//! | path             | method | role    |
//! |------------------|--------|---------|
//! | /api/staff       | GET    | manager |
//! | /api/staff       | POST   | manager |
//! | /api/staff/{id}  | PATCH  | manager |
//! | /api/staff/{id}  | DELETE | owner   |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch},
};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/staff", routes())
}

fn routes() -> Router<AppState> {
    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", patch(handler::update))
        .route_layer(middleware::from_fn(require_role(UserRole::Manager)));

    let owner_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .route_layer(middleware::from_fn(require_role(UserRole::Owner)));

    manage_routes.merge(owner_routes)
}
