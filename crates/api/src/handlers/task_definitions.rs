use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use coursetrack_core::{
    models::task_definition::{
        CreateTaskDefinitionRequest, GenerationReport, TaskDefinition, TaskDefinitionResponse,
        UpdateTaskDefinitionRequest,
    },
    services::task_definitions,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extract::{AppJson, AppQuery},
    middleware::{auth::Owner, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionListQuery {
    pub course_id: Uuid,
}

/// Creates the definition and materializes its instances for the whole
/// semester. The `generation` field reports how that went.
#[axum::debug_handler]
pub async fn create_task_definition(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppJson(payload): AppJson<CreateTaskDefinitionRequest>,
) -> Result<(StatusCode, Json<TaskDefinitionResponse>), AppError> {
    let response = task_definitions::create(state.store.as_ref(), owner_id, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[axum::debug_handler]
pub async fn list_task_definitions(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<DefinitionListQuery>,
) -> Result<Json<Vec<TaskDefinition>>, AppError> {
    let list = task_definitions::list(state.store.as_ref(), owner_id, query.course_id).await?;
    Ok(Json(list))
}

#[axum::debug_handler]
pub async fn get_task_definition(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskDefinition>, AppError> {
    let definition = task_definitions::get(state.store.as_ref(), owner_id, id).await?;
    Ok(Json(definition))
}

/// Saves the edit, then regenerates instances from the start of today.
#[axum::debug_handler]
pub async fn update_task_definition(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateTaskDefinitionRequest>,
) -> Result<Json<TaskDefinitionResponse>, AppError> {
    let today = state.today();
    let response =
        task_definitions::update(state.store.as_ref(), owner_id, id, payload, today).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn resync_task_definition(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<GenerationReport>, AppError> {
    let today = state.today();
    let report = task_definitions::resync(state.store.as_ref(), owner_id, id, today).await?;
    Ok(Json(report))
}

#[axum::debug_handler]
pub async fn delete_task_definition(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    task_definitions::delete(state.store.as_ref(), owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
