//! Room Service Routes
//!
//! Guest service requests and in-room orders, per reservation and as
//! property-wide work queues. Paths are under `/api/properties/{property_id}`.

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/properties/{property_id}", routes())
}

fn routes() -> Router<AppState> {
    let requests = Router::new()
        .route(
            "/reservations/{reservation_id}/requests",
            get(handler::list_reservation_requests).post(handler::create_request),
        )
        .route("/requests", get(handler::list_requests))
        .route("/requests/{request_id}/status", patch(handler::update_request_status));

    let orders = Router::new()
        .route(
            "/reservations/{reservation_id}/orders",
            get(handler::list_reservation_orders).post(handler::create_order),
        )
        .route("/orders", get(handler::list_orders))
        .route("/orders/{order_id}", get(handler::get_order))
        .route("/orders/{order_id}/status", patch(handler::update_order_status));

    requests.merge(orders)
}
