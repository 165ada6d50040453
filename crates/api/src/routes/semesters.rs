use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/semesters",
            get(handlers::semesters::list_semesters)
                .post(handlers::semesters::create_semester),
        )
        .route(
            "/api/semesters/:id",
            get(handlers::semesters::get_semester)
                .put(handlers::semesters::update_semester)
                .delete(handlers::semesters::delete_semester),
        )
}
