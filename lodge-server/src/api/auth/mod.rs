//! Authentication Routes
//!
//! - register/login: public, rate limited per client IP
//! - logout: public (only clears the cookie)
//! - me/password: session required

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::state::AppState;

pub fn public_router(state: &AppState) -> Router<AppState> {
    let register = Router::new()
        .route("/api/auth/register", post(handler::register))
        .route_layer(middleware::from_fn_with_state(state.clone(), register_rate_limit));

    let login = Router::new()
        .route("/api/auth/login", post(handler::login))
        .route_layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    Router::new()
        .route("/api/auth/logout", post(handler::logout))
        .merge(register)
        .merge(login)
}

/// Routes that need `require_auth` applied by the caller
pub fn session_router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(handler::me))
        .route("/api/auth/password", put(handler::change_password))
}
