//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{routing::get, Router};

use crate::{middleware::auth::auth_middleware, AppState};

mod auth;
mod health;
mod organizations;

pub use health::*;

/// Public API routes (no authentication required)
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/detailed", get(health::health_check_detailed))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
}

/// Protected API routes (authentication required)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::routes())
        .nest("/organizations", organizations::routes())
}

/// The `/api/v1` tree with the session middleware applied to protected routes
///
/// Authentication is layered onto the protected routes only, so the health
/// checks stay reachable without a token.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", public_routes())
        .nest(
            "/api/v1",
            protected_routes().layer(axum::middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state)
}
