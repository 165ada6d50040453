use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use coursetrack_core::{
    models::course::{Course, CreateCourseRequest, UpdateCourseRequest},
    services::courses,
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
pub struct CourseListQuery {
    pub semester_id: Uuid,
}

#[axum::debug_handler]
pub async fn create_course(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppJson(payload): AppJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = courses::create(state.store.as_ref(), owner_id, payload).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// `GET /api/courses?semesterId=...`
#[axum::debug_handler]
pub async fn list_courses(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<CourseListQuery>,
) -> Result<Json<Vec<Course>>, AppError> {
    let list = courses::list(state.store.as_ref(), owner_id, query.semester_id).await?;
    Ok(Json(list))
}

#[axum::debug_handler]
pub async fn get_course(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<Course>, AppError> {
    Ok(Json(courses::get(state.store.as_ref(), owner_id, id).await?))
}

#[axum::debug_handler]
pub async fn update_course(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = courses::update(state.store.as_ref(), owner_id, id, payload).await?;
    Ok(Json(course))
}

/// Removes the course with its definitions, instances and assignments.
#[axum::debug_handler]
pub async fn delete_course(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    courses::delete(state.store.as_ref(), owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
