use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/views/daily", get(handlers::views::daily))
        .route("/api/views/weekly", get(handlers::views::weekly))
        .route("/api/views/semester", get(handlers::views::semester))
        .route("/api/views/gaps", get(handlers::views::gaps))
        .route("/api/views/upcoming", get(handlers::views::upcoming))
}
