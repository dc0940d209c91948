//! Reservation Routes
//!
//! | path                              | method | role    |
//! |-----------------------------------|--------|---------|
//! | /                                 | GET    | staff   |
//! | /                                 | POST   | staff   |
//! | /{reservation_id}                 | GET    | staff   |
//! | /{reservation_id}                 | PATCH  | staff   |
//! | /{reservation_id}/check-in        | POST   | staff   |
//! | /{reservation_id}/check-out       | POST   | staff   |
//! | /{reservation_id}/cancel          | POST   | staff   |
//! | /{reservation_id}/no-show         | POST   | staff   |
//! | /{reservation_id}                 | DELETE | manager |
//!
//! All paths are under `/api/properties/{property_id}/reservations`.

mod handler;
mod pricing;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/properties/{property_id}/reservations", routes())
}

fn routes() -> Router<AppState> {
    let desk_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{reservation_id}",
            get(handler::get_by_id).patch(handler::update),
        )
        .route("/{reservation_id}/check-in", post(handler::check_in))
        .route("/{reservation_id}/check-out", post(handler::check_out))
        .route("/{reservation_id}/cancel", post(handler::cancel))
        .route("/{reservation_id}/no-show", post(handler::no_show));

    let manage_routes = Router::new()
        .route("/{reservation_id}", delete(handler::delete))
        .route_layer(middleware::from_fn(require_role(UserRole::Manager)));

    desk_routes.merge(manage_routes)
}
