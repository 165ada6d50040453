use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/assignments",
            get(handlers::assignments::list_assignments)
                .post(handlers::assignments::create_assignment),
        )
        .route(
            "/api/assignments/:id",
            get(handlers::assignments::get_assignment)
                .put(handlers::assignments::update_assignment)
                .delete(handlers::assignments::delete_assignment),
        )
}
