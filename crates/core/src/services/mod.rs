//! Owner-scoped CRUD over the [`PlannerStore`] port.
//!
//! Every operation takes the caller's owner id explicitly. A missing target
//! entity is `NotFound`; a missing or foreign *parent* referenced by a request
//! is `AccessDenied`. Deletes that own children go through the explicit
//! cascades in [`crate::regeneration`].

pub mod assignments;
pub mod courses;
pub mod notes;
pub mod semesters;
pub mod task_definitions;
pub mod task_instances;

use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::{
    course::Course, semester::Semester, task_definition::TaskDefinition,
    task_instance::TaskInstance,
};
use crate::store::PlannerStore;

pub(crate) async fn visible_semester(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
) -> TrackResult<Semester> {
    store
        .get_semester(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::parent_unavailable("Semester", id))
}

pub(crate) async fn visible_course(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
) -> TrackResult<Course> {
    store
        .get_course(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::parent_unavailable("Course", id))
}

pub(crate) async fn visible_definition(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
) -> TrackResult<TaskDefinition> {
    store
        .get_definition(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::parent_unavailable("Task definition", id))
}

pub(crate) async fn visible_instance(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
) -> TrackResult<TaskInstance> {
    store
        .get_instance(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::parent_unavailable("Task instance", id))
}

/// Turns the `false` of an owner-scoped update or delete into `NotFound`.
pub(crate) fn ensure_found(found: bool, entity: &str, id: Uuid) -> TrackResult<()> {
    if found {
        Ok(())
    } else {
        Err(TrackError::not_found(entity, id))
    }
}
