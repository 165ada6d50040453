use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use coursetrack_core::{
    models::semester::{CreateSemesterRequest, Semester, UpdateSemesterRequest},
    services::semesters,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extract::AppJson,
    middleware::{auth::Owner, error_handling::AppError},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_semester(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppJson(payload): AppJson<CreateSemesterRequest>,
) -> Result<(StatusCode, Json<Semester>), AppError> {
    let semester = semesters::create(state.store.as_ref(), owner_id, payload).await?;
    Ok((StatusCode::CREATED, Json(semester)))
}

#[axum::debug_handler]
pub async fn list_semesters(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
) -> Result<Json<Vec<Semester>>, AppError> {
    Ok(Json(semesters::list(state.store.as_ref(), owner_id).await?))
}

#[axum::debug_handler]
pub async fn get_semester(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<Semester>, AppError> {
    Ok(Json(semesters::get(state.store.as_ref(), owner_id, id).await?))
}

#[axum::debug_handler]
pub async fn update_semester(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateSemesterRequest>,
) -> Result<Json<Semester>, AppError> {
    let semester = semesters::update(state.store.as_ref(), owner_id, id, payload).await?;
    Ok(Json(semester))
}

#[axum::debug_handler]
pub async fn delete_semester(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    semesters::delete(state.store.as_ref(), owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
