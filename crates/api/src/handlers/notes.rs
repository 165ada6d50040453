use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use coursetrack_core::{
    models::note::{CreateNoteRequest, Note, UpdateNoteRequest},
    services::notes,
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
pub struct NoteListQuery {
    pub task_instance_id: Uuid,
}

#[axum::debug_handler]
pub async fn create_note(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppJson(payload): AppJson<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let note = notes::create(state.store.as_ref(), owner_id, payload).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

#[axum::debug_handler]
pub async fn list_notes(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<NoteListQuery>,
) -> Result<Json<Vec<Note>>, AppError> {
    let list = notes::list(state.store.as_ref(), owner_id, query.task_instance_id).await?;
    Ok(Json(list))
}

#[axum::debug_handler]
pub async fn get_note(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>, AppError> {
    Ok(Json(notes::get(state.store.as_ref(), owner_id, id).await?))
}

#[axum::debug_handler]
pub async fn update_note(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateNoteRequest>,
) -> Result<Json<Note>, AppError> {
    Ok(Json(notes::update(state.store.as_ref(), owner_id, id, payload).await?))
}

#[axum::debug_handler]
pub async fn delete_note(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    notes::delete(state.store.as_ref(), owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
