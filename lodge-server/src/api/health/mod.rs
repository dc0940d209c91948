//! Health check
//!
//! | path    | method | auth |
//! |---------|--------|------|
//! | /health | GET    | none |

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "lodge-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}
