use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::optional_text;

pub const MAX_LEVEL_OF_UNDERSTANDING: u8 = 10;

/// One dated occurrence of a task definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInstance {
    pub id: Uuid,
    pub date: NaiveDateTime,
    pub is_completed: bool,
    pub description: Option<String>,
    pub level_of_understanding: Option<u8>,
    pub task_definition_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An instance that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskInstance {
    pub date: NaiveDateTime,
    pub is_completed: bool,
    pub description: Option<String>,
    pub level_of_understanding: Option<u8>,
    pub task_definition_id: Uuid,
    pub owner_id: Uuid,
}

impl NewTaskInstance {
    pub fn pending(task_definition_id: Uuid, owner_id: Uuid, date: NaiveDateTime) -> Self {
        Self {
            date,
            is_completed: false,
            description: None,
            level_of_understanding: None,
            task_definition_id,
            owner_id,
        }
    }

    pub fn into_instance(self) -> TaskInstance {
        let now = Utc::now();
        TaskInstance {
            id: Uuid::new_v4(),
            date: self.date,
            is_completed: self.is_completed,
            description: self.description,
            level_of_understanding: self.level_of_understanding,
            task_definition_id: self.task_definition_id,
            owner_id: self.owner_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInstanceRequest {
    pub date: NaiveDateTime,
    pub task_definition_id: Uuid,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub level_of_understanding: Option<u8>,
}

impl CreateTaskInstanceRequest {
    pub fn into_new_instance(self, owner_id: Uuid) -> TrackResult<NewTaskInstance> {
        validate_level(self.level_of_understanding)?;
        Ok(NewTaskInstance {
            date: self.date,
            is_completed: self.is_completed.unwrap_or(false),
            description: optional_text(self.description.as_deref()),
            level_of_understanding: self.level_of_understanding,
            task_definition_id: self.task_definition_id,
            owner_id,
        })
    }
}

/// The only fields of an instance that may change after creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInstanceRequest {
    pub is_completed: Option<bool>,
    pub description: Option<String>,
    pub level_of_understanding: Option<u8>,
}

impl UpdateTaskInstanceRequest {
    pub fn is_empty(&self) -> bool {
        self.is_completed.is_none()
            && self.description.is_none()
            && self.level_of_understanding.is_none()
    }

    pub fn apply(self, instance: &mut TaskInstance) -> TrackResult<()> {
        if self.is_empty() {
            return Err(TrackError::Validation(
                "No valid fields provided for update".to_string(),
            ));
        }
        validate_level(self.level_of_understanding)?;
        if let Some(is_completed) = self.is_completed {
            instance.is_completed = is_completed;
        }
        if self.description.is_some() {
            instance.description = optional_text(self.description.as_deref());
        }
        if self.level_of_understanding.is_some() {
            instance.level_of_understanding = self.level_of_understanding;
        }
        instance.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCompletionRequest {
    pub is_completed: bool,
}

/// Owner-scoped instance query. `from` is inclusive, `until` exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceFilter {
    pub task_definition_ids: Option<Vec<Uuid>>,
    pub from: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
    pub is_completed: Option<bool>,
}

impl InstanceFilter {
    pub fn between(from: NaiveDateTime, until: NaiveDateTime) -> Self {
        Self {
            from: Some(from),
            until: Some(until),
            ..Self::default()
        }
    }

    pub fn for_definitions(ids: Vec<Uuid>) -> Self {
        Self {
            task_definition_ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn matches(&self, instance: &TaskInstance) -> bool {
        self.task_definition_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&instance.task_definition_id))
            && self.from.is_none_or(|from| instance.date >= from)
            && self.until.is_none_or(|until| instance.date < until)
            && self
                .is_completed
                .is_none_or(|completed| instance.is_completed == completed)
    }
}

fn validate_level(level: Option<u8>) -> TrackResult<()> {
    if level.is_some_and(|l| l > MAX_LEVEL_OF_UNDERSTANDING) {
        return Err(TrackError::Validation(format!(
            "Level of understanding must be between 0 and {}",
            MAX_LEVEL_OF_UNDERSTANDING
        )));
    }
    Ok(())
}
