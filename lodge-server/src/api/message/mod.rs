//! Guest Message Routes

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api/properties/{property_id}/reservations/{reservation_id}/messages",
        routes(),
    )
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{message_id}/read", post(handler::mark_read))
}
