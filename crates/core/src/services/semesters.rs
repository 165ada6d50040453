use tracing::info;
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::semester::{CreateSemesterRequest, Semester, UpdateSemesterRequest};
use crate::models::task_instance::InstanceFilter;
use crate::regeneration;
use crate::services::ensure_found;
use crate::store::PlannerStore;

pub async fn create(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    request: CreateSemesterRequest,
) -> TrackResult<Semester> {
    let semester = request.into_semester(owner_id)?;
    store.insert_semester(&semester).await?;
    info!("Created semester {} ({} weeks)", semester.id, semester.number_of_weeks);
    Ok(semester)
}

pub async fn list(store: &dyn PlannerStore, owner_id: Uuid) -> TrackResult<Vec<Semester>> {
    store.list_semesters(owner_id).await
}

pub async fn get(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<Semester> {
    store
        .get_semester(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::not_found("Semester", id))
}

/// Renames are always allowed; moving or resizing the timeframe is refused
/// once any instance has been materialized under the semester.
pub async fn update(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
    request: UpdateSemesterRequest,
) -> TrackResult<Semester> {
    let mut semester = get(store, owner_id, id).await?;

    if request.changes_timeframe(&semester) && has_instances(store, owner_id, id).await? {
        return Err(TrackError::Validation(
            "Start date and number of weeks cannot change once task instances exist".to_string(),
        ));
    }

    request.apply(&mut semester)?;
    let updated = store.update_semester(&semester).await?;
    ensure_found(updated, "Semester", id)?;
    Ok(semester)
}

pub async fn delete(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<()> {
    let deleted = regeneration::delete_semester(store, owner_id, id).await?;
    ensure_found(deleted, "Semester", id)
}

async fn has_instances(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    semester_id: Uuid,
) -> TrackResult<bool> {
    let course_ids: Vec<Uuid> = store
        .list_courses(owner_id, semester_id)
        .await?
        .iter()
        .map(|c| c.id)
        .collect();
    if course_ids.is_empty() {
        return Ok(false);
    }
    let definition_ids: Vec<Uuid> = store
        .list_definitions(owner_id, &course_ids)
        .await?
        .iter()
        .map(|d| d.id)
        .collect();
    if definition_ids.is_empty() {
        return Ok(false);
    }
    let instances = store
        .list_instances(owner_id, &InstanceFilter::for_definitions(definition_ids))
        .await?;
    Ok(!instances.is_empty())
}
