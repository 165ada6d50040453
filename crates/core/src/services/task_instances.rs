use chrono::{Days, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::task_instance::{CreateTaskInstanceRequest, InstanceFilter, TaskInstance};
use crate::services::{ensure_found, visible_definition};
use crate::store::PlannerStore;
use crate::time;

/// Query parameters for listing instances. Dates are `YYYY-MM-DD` and both
/// bounds are inclusive whole days.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceQuery {
    pub task_definition_id: Option<Uuid>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl InstanceQuery {
    pub fn to_filter(&self) -> TrackResult<InstanceFilter> {
        let start = parse_bound("startDate", self.start_date.as_deref())?;
        let until = parse_bound("endDate", self.end_date.as_deref())?
            .map(|end| {
                end.checked_add_days(Days::new(1)).ok_or_else(|| {
                    TrackError::Validation(format!(
                        "endDate {} is outside the supported range",
                        end
                    ))
                })
            })
            .transpose()?;
        Ok(InstanceFilter {
            task_definition_ids: self.task_definition_id.map(|id| vec![id]),
            from: start.map(time::start_of_day),
            until: until.map(time::start_of_day),
            is_completed: None,
        })
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> TrackResult<Option<NaiveDate>> {
    value
        .map(|v| {
            time::parse_date(v).ok_or_else(|| {
                TrackError::Validation(format!("{} must be a YYYY-MM-DD date, got '{}'", name, v))
            })
        })
        .transpose()
}

/// Adds a single instance by hand. The slot `(definition, date)` must be free.
pub async fn create(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    request: CreateTaskInstanceRequest,
) -> TrackResult<TaskInstance> {
    let record = request.into_new_instance(owner_id)?;
    visible_definition(store, owner_id, record.task_definition_id).await?;
    store.insert_instance(&record).await?.ok_or_else(|| {
        TrackError::Validation(format!(
            "Task definition {} already has an instance at {}",
            record.task_definition_id, record.date
        ))
    })
}

pub async fn list(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    query: &InstanceQuery,
) -> TrackResult<Vec<TaskInstance>> {
    let filter = query.to_filter()?;
    store.list_instances(owner_id, &filter).await
}

pub async fn get(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<TaskInstance> {
    store
        .get_instance(owner_id, id)
        .await?
        .ok_or_else(|| TrackError::not_found("Task instance", id))
}

/// Removes the instance and any notes attached to it.
pub async fn delete(store: &dyn PlannerStore, owner_id: Uuid, id: Uuid) -> TrackResult<()> {
    let deleted = store.delete_instance(owner_id, id).await?;
    ensure_found(deleted, "Task instance", id)
}
