//! Availability Routes

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/properties/{property_id}/availability",
        get(handler::search),
    )
}
