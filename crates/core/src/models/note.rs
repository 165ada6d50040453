use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TrackResult;
use crate::models::{optional_text, required_text};

/// Free-form notes attached to a single task instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: String,
    pub task_instance_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub description: String,
    pub task_instance_id: Uuid,
}

impl CreateNoteRequest {
    pub fn into_note(self, owner_id: Uuid) -> TrackResult<Note> {
        let now = Utc::now();
        Ok(Note {
            id: Uuid::new_v4(),
            title: optional_text(self.title.as_deref()),
            description: required_text("Note description", &self.description)?,
            task_instance_id: self.task_instance_id,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateNoteRequest {
    pub fn apply(self, note: &mut Note) -> TrackResult<()> {
        if self.title.is_some() {
            note.title = optional_text(self.title.as_deref());
        }
        if let Some(description) = &self.description {
            note.description = required_text("Note description", description)?;
        }
        note.updated_at = Utc::now();
        Ok(())
    }
}
