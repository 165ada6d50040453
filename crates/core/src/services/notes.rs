use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::note::{CreateNoteRequest, Note, UpdateNoteRequest};
use crate::services::{ensure_found, visible_instance};
use crate::store::PlannerStore;

pub async fn create(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    request: CreateNoteRequest,
) -> TrackResult<Note> {
    let note = request.into_note(owner_id)?;
    visible_instance(store, owner_id, note.task_instance_id).await?;
    store.insert_note(&note).await?;
    Ok(note)
}

pub async fn list(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    task_instance_id: Uuid,
) -> TrackResult<Vec<Note>> {
    visible_instance(store, owner_id, task_instance_id).await?;
    store.list_notes(owner_id, task_instance_id).await
}

pub async fn get(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<Note> {
    store
        .get_note(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::not_found("Note", id))
}

pub async fn update(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
    request: UpdateNoteRequest,
) -> TrackResult<Note> {
    let mut note = get(store, owner_id, id).await?;
    request.apply(&mut note)?;
    let updated = store.update_note(&note).await?;
    ensure_found(updated, "Note", id)?;
    Ok(note)
}

pub async fn delete(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<()> {
    let deleted = store.delete_note(owner_id, id).await?;
    ensure_found(deleted, "Note", id)
}
