use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/taskinstances",
            get(handlers::task_instances::list_task_instances)
                .post(handlers::task_instances::create_task_instance),
        )
        .route(
            "/api/taskinstances/:id",
            get(handlers::task_instances::get_task_instance)
                .put(handlers::task_instances::update_task_instance)
                .delete(handlers::task_instances::delete_task_instance),
        )
        .route(
            "/api/taskinstances/:id/completion",
            put(handlers::task_instances::set_completion),
        )
}
