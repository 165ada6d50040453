use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/courses",
            get(handlers::courses::list_courses)
                .post(handlers::courses::create_course),
        )
        .route(
            "/api/courses/:id",
            get(handlers::courses::get_course)
                .put(handlers::courses::update_course)
                .delete(handlers::courses::delete_course),
        )
}
