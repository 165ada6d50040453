use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use coursetrack_core::{
    models::assignment::{Assignment, CreateAssignmentRequest, UpdateAssignmentRequest},
    services::assignments,
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
pub struct AssignmentListQuery {
    pub course_id: Uuid,
}

#[axum::debug_handler]
pub async fn create_assignment(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppJson(payload): AppJson<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let assignment = assignments::create(state.store.as_ref(), owner_id, payload).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

#[axum::debug_handler]
pub async fn list_assignments(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<AssignmentListQuery>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    let list = assignments::list(state.store.as_ref(), owner_id, query.course_id).await?;
    Ok(Json(list))
}

#[axum::debug_handler]
pub async fn get_assignment(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = assignments::get(state.store.as_ref(), owner_id, id).await?;
    Ok(Json(assignment))
}

#[axum::debug_handler]
pub async fn update_assignment(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateAssignmentRequest>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = assignments::update(state.store.as_ref(), owner_id, id, payload).await?;
    Ok(Json(assignment))
}

#[axum::debug_handler]
pub async fn delete_assignment(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    assignments::delete(state.store.as_ref(), owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
