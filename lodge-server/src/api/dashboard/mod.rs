//! Dashboard Routes

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard", get(handler::account))
        .route(
            "/api/properties/{property_id}/dashboard",
            get(handler::property),
        )
}
