use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/taskdefinitions",
            get(handlers::task_definitions::list_task_definitions)
                .post(handlers::task_definitions::create_task_definition),
        )
        .route(
            "/api/taskdefinitions/:id",
            get(handlers::task_definitions::get_task_definition)
                .put(handlers::task_definitions::update_task_definition)
                .delete(handlers::task_definitions::delete_task_definition),
        )
        .route(
            "/api/taskdefinitions/:id/resync",
            post(handlers::task_definitions::resync_task_definition),
        )
}
