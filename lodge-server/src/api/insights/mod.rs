//! Insight Routes
//!
//! - `/api/insights/status` - which features the license unlocks
//! - `/api/insights/guests/{guest_id}/churn` - guest churn risk
//! - `/api/properties/{property_id}/insights/*` - forecast, pricing, payment screening
//!
//! Each feature endpoint checks its license feature; see [`crate::insights`].

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/api/insights", account_routes())
        .nest("/api/properties/{property_id}/insights", routes())
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handler::status))
        .route("/guests/{guest_id}/churn", get(handler::churn))
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/forecast", get(handler::forecast))
        .route("/pricing", get(handler::pricing))
        .route("/payments/{payment_id}/fraud", get(handler::fraud))
}
