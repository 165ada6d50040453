use tracing::info;
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::course::{Course, CreateCourseRequest, UpdateCourseRequest};
use crate::regeneration;
use crate::services::{ensure_found, visible_semester};
use crate::store::PlannerStore;

pub async fn create(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    request: CreateCourseRequest,
) -> TrackResult<Course> {
    let course = request.into_course(owner_id)?;
    visible_semester(store, owner_id, course.semester_id).await?;
    store.insert_course(&course).await?;
    info!("Created course {} in semester {}", course.id, course.semester_id);
    Ok(course)
}

/// Courses of one semester, alphabetical.
pub async fn list(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    semester_id: Uuid,
) -> TrackResult<Vec<Course>> {
    visible_semester(store, owner_id, semester_id).await?;
    store.list_courses(owner_id, semester_id).await
}

pub async fn get(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<Course> {
    store
        .get_course(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::not_found("Course", id))
}

pub async fn update(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    id: Uuid,
    request: UpdateCourseRequest,
) -> TrackResult<Course> {
    let mut course = get(store, owner_id, id).await?;
    request.apply(&mut course)?;
    let updated = store.update_course(&course).await?;
    ensure_found(updated, "Course", id)?;
    Ok(course)
}

pub async fn delete(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<()> {
    let deleted = regeneration::delete_course(store, owner_id, id).await?;
    ensure_found(deleted, "Course", id)
}
