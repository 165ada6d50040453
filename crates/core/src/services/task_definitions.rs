use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::task_definition::{
    CreateTaskDefinitionRequest, GenerationReport, TaskDefinition, TaskDefinitionResponse,
    UpdateTaskDefinitionRequest,
};
use crate::regeneration;
use crate::services::{ensure_found, visible_course};
use crate::store::{PlannerStore, ReplaceOutcome};

/// Orders definitions by type name, then description.
pub fn display_order(a: &TaskDefinition, b: &TaskDefinition) -> Ordering {
    a.task_type
        .as_str()
        .cmp(b.task_type.as_str())
        .then_with(|| {
            a.description
                .as_deref()
                .unwrap_or("")
                .cmp(b.description.as_deref().unwrap_or(""))
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Persists the definition, then materializes its instances. The definition
/// is kept even when materialization fails; the report says so.
pub async fn create(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    request: CreateTaskDefinitionRequest,
) -> TrackResult<TaskDefinitionResponse> {
    let definition = request.into_definition(owner_id)?;
    visible_course(store, owner_id, definition.course_id).await?;
    store.insert_definition(&definition).await?;
    info!(
        "Created task definition {} for course {}",
        definition.id, definition.course_id
    );

    let generation = regeneration::on_create(store, &definition).await;
    Ok(TaskDefinitionResponse {
        definition,
        generation,
    })
}

pub async fn list(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    course_id: Uuid,
) -> TrackResult<Vec<TaskDefinition>> {
    visible_course(store, owner_id, course_id).await?;
    let mut definitions = store.list_definitions(owner_id, &[course_id]).await?;
    definitions.sort_by(display_order);
    Ok(definitions)
}

pub async fn get(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
) -> TrackResult<TaskDefinition> {
    store
        .get_definition(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::not_found("Task definition", id))
}

/// Saves the edit and regenerates instances from the start of `today`.
pub async fn update(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
    request: UpdateTaskDefinitionRequest,
    today: NaiveDate,
) -> TrackResult<TaskDefinitionResponse> {
    request.validate()?;
    let mut definition = get(store, owner_id, id).await?;
    request.apply(&mut definition)?;
    let updated = store.update_definition(&definition).await?;
    ensure_found(updated, "Task definition", id)?;

    let generation = regeneration::on_update(store, &definition, today).await;
    Ok(TaskDefinitionResponse {
        definition,
        generation,
    })
}

/// Explicit re-synchronisation; unlike [`update`], failures are returned.
pub async fn resync(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
    today: NaiveDate,
) -> TrackResult<GenerationReport> {
    let definition = get(store, owner_id, id).await?;
    let ReplaceOutcome { removed, created } =
        regeneration::resync(store, &definition, today).await?;
    info!(
        "Resynced task definition {}: removed {}, created {}",
        id, removed, created
    );
    Ok(GenerationReport::Materialized { created, removed })
}

pub async fn delete(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<()> {
    let deleted = regeneration::delete_definition(store, owner_id, id).await?;
    ensure_found(deleted, "Task definition", id)
}
