//! Folio Routes
//!
//! The guest bill of one reservation. Voiding a charge needs a manager.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::models::UserRole;

use crate::auth::require_role;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api/properties/{property_id}/reservations/{reservation_id}/folio",
        routes(),
    )
}

fn routes() -> Router<AppState> {
    let desk_routes = Router::new()
        .route("/", get(handler::get))
        .route("/charges", post(handler::add_charge))
        .route("/payments", post(handler::add_payment));

    let manage_routes = Router::new()
        .route("/charges/{charge_id}/void", post(handler::void_charge))
        .route_layer(middleware::from_fn(require_role(UserRole::Manager)));

    desk_routes.merge(manage_routes)
}
