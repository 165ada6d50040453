//! The in-place mutation path for a single task instance.
//!
//! Only completion, description and level of understanding ever change here.
//! Nothing derived is written back; the next projection picks up the change.

use tracing::debug;
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::task_instance::{TaskInstance, UpdateTaskInstanceRequest};
use crate::store::PlannerStore;

pub async fn set_completion(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    instance_id: Uuid,
    is_completed: bool,
) -> TrackResult<TaskInstance> {
    let request = UpdateTaskInstanceRequest {
        is_completed: Some(is_completed),
        ..UpdateTaskInstanceRequest::default()
    };
    update_instance(store, owner_id, instance_id, request).await
}

/// Last writer wins.
pub async fn update_instance(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    instance_id: Uuid,
    request: UpdateTaskInstanceRequest,
) -> TrackResult<TaskInstance> {
    let mut instance = store
        .get_instance(owner_id, instance_id)
        .await?
        .ok_or_else(|| TrackError::not_found("Task instance", instance_id))?;

    request.apply(&mut instance)?;

    if !store.update_instance(&instance).await? {
        return Err(TrackError::not_found("Task instance", instance_id));
    }
    debug!(
        "Updated task instance {} (completed: {})",
        instance.id, instance.is_completed
    );
    Ok(instance)
}
