use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TrackResult;
use crate::models::{optional_text, required_text};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDateTime,
    pub is_completed: bool,
    pub course_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: NaiveDateTime,
    pub is_completed: Option<bool>,
    pub course_id: Uuid,
}

impl CreateAssignmentRequest {
    pub fn into_assignment(self, owner_id: Uuid) -> TrackResult<Assignment> {
        let now = Utc::now();
        Ok(Assignment {
            id: Uuid::new_v4(),
            title: required_text("Assignment title", &self.title)?,
            description: optional_text(self.description.as_deref()),
            due_date: self.due_date,
            is_completed: self.is_completed.unwrap_or(false),
            course_id: self.course_id,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub is_completed: Option<bool>,
}

impl UpdateAssignmentRequest {
    pub fn apply(self, assignment: &mut Assignment) -> TrackResult<()> {
        if let Some(title) = &self.title {
            assignment.title = required_text("Assignment title", title)?;
        }
        if self.description.is_some() {
            assignment.description = optional_text(self.description.as_deref());
        }
        if let Some(due_date) = self.due_date {
            assignment.due_date = due_date;
        }
        if let Some(is_completed) = self.is_completed {
            assignment.is_completed = is_completed;
        }
        assignment.updated_at = Utc::now();
        Ok(())
    }
}

/// Owner-scoped assignment query. `due_from` is inclusive, `due_until` exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentFilter {
    pub course_ids: Option<Vec<Uuid>>,
    pub due_from: Option<NaiveDateTime>,
    pub due_until: Option<NaiveDateTime>,
}

impl AssignmentFilter {
    pub fn matches(&self, assignment: &Assignment) -> bool {
        self.course_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&assignment.course_id))
            && self.due_from.is_none_or(|from| assignment.due_date >= from)
            && self.due_until.is_none_or(|until| assignment.due_date < until)
    }
}
