use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use coursetrack_core::{
    completion,
    models::task_instance::{
        CreateTaskInstanceRequest, SetCompletionRequest, TaskInstance, UpdateTaskInstanceRequest,
    },
    services::task_instances::{self, InstanceQuery},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extract::{AppJson, AppQuery},
    middleware::{auth::Owner, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_task_instance(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppJson(payload): AppJson<CreateTaskInstanceRequest>,
) -> Result<(StatusCode, Json<TaskInstance>), AppError> {
    let instance = task_instances::create(state.store.as_ref(), owner_id, payload).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// `GET /api/taskinstances?taskDefinitionId=&startDate=&endDate=`
#[axum::debug_handler]
pub async fn list_task_instances(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<InstanceQuery>,
) -> Result<Json<Vec<TaskInstance>>, AppError> {
    let list = task_instances::list(state.store.as_ref(), owner_id, &query).await?;
    Ok(Json(list))
}

#[axum::debug_handler]
pub async fn get_task_instance(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskInstance>, AppError> {
    let instance = task_instances::get(state.store.as_ref(), owner_id, id).await?;
    Ok(Json(instance))
}

#[axum::debug_handler]
pub async fn update_task_instance(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateTaskInstanceRequest>,
) -> Result<Json<TaskInstance>, AppError> {
    let instance = completion::update_instance(state.store.as_ref(), owner_id, id, payload).await?;
    Ok(Json(instance))
}

#[axum::debug_handler]
pub async fn set_completion(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<SetCompletionRequest>,
) -> Result<Json<TaskInstance>, AppError> {
    let instance =
        completion::set_completion(state.store.as_ref(), owner_id, id, payload.is_completed)
            .await?;
    Ok(Json(instance))
}

#[axum::debug_handler]
pub async fn delete_task_instance(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    task_instances::delete(state.store.as_ref(), owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
