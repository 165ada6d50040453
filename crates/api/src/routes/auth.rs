use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

/// Routes reachable without a session.
pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
}

/// Routes that act on the caller's current session.
pub fn session_routes() -> Router<Arc<ApiState>> {
    Router::new().route("/api/auth/logout", post(handlers::auth::logout))
}
