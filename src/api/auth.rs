//! Session endpoints

use axum::{routing::get, Json, Router};

use crate::{middleware::AuthUser, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// Get current authenticated user
///
/// GET /api/v1/auth/me
async fn get_current_user(auth_user: AuthUser) -> Json<AuthUser> {
    Json(auth_user)
}
