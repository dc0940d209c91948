//! lodge-server - hotel property-management backend
//!
//! JSON REST API over PostgreSQL:
//! - Properties, room types, rooms and rate plans
//! - Guests, reservations with availability checking, folios
//! - Room service requests/orders and guest messaging
//! - Staff accounts, cookie/JWT sessions and license gating
//! - Dashboards and license-gated occupancy insights

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod insights;
pub mod license;
pub mod state;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use config::Config;
pub use state::AppState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    let Some(origin) = config
        .cors_allow_origin
        .as_deref()
        .and_then(|o| HeaderValue::from_str(o).ok())
    else {
        return CorsLayer::permissive();
    };
    // cookies need an explicit origin
    CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::PATCH,
            http::Method::DELETE,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Build the application with all middleware and state
///
/// Used by the HTTP server and by integration tests.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    api::create_router(state)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // Propagate must sit inside Set so it sees the generated id
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}
