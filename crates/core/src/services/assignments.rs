use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::assignment::{
    Assignment, AssignmentFilter, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::services::{ensure_found, visible_course};
use crate::store::PlannerStore;

pub async fn create(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    request: CreateAssignmentRequest,
) -> TrackResult<Assignment> {
    let assignment = request.into_assignment(owner_id)?;
    visible_course(store, owner_id, assignment.course_id).await?;
    store.insert_assignment(&assignment).await?;
    Ok(assignment)
}

/// Assignments of one course, nearest due date first.
pub async fn list(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    course_id: Uuid,
) -> TrackResult<Vec<Assignment>> {
    visible_course(store, owner_id, course_id).await?;
    let filter = AssignmentFilter {
        course_ids: Some(vec![course_id]),
        ..AssignmentFilter::default()
    };
    store.list_assignments(owner_id, &filter).await
}

pub async fn get(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<Assignment> {
    store
        .get_assignment(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::not_found("Assignment", id))
}

pub async fn update(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
    request: UpdateAssignmentRequest,
) -> TrackResult<Assignment> {
    let mut assignment = get(store, owner_id, id).await?;
    request.apply(&mut assignment)?;
    let updated = store.update_assignment(&assignment).await?;
    ensure_found(updated, "Assignment", id)?;
    Ok(assignment)
}

pub async fn delete(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<()> {
    let deleted = store.delete_assignment(owner_id, id).await?;
    ensure_found(deleted, "Assignment", id)
}
