use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TrackResult;
use crate::models::{optional_text, required_text};

pub const DEFAULT_COURSE_COLOR: &str = "#cccccc";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub instructor: Option<String>,
    pub description: Option<String>,
    pub semester_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub name: String,
    pub color: Option<String>,
    pub instructor: Option<String>,
    pub description: Option<String>,
    pub semester_id: Uuid,
}

impl CreateCourseRequest {
    pub fn into_course(self, owner_id: Uuid) -> TrackResult<Course> {
        let now = Utc::now();
        Ok(Course {
            id: Uuid::new_v4(),
            name: required_text("Course name", &self.name)?,
            color: optional_text(self.color.as_deref())
                .unwrap_or_else(|| DEFAULT_COURSE_COLOR.to_string()),
            instructor: optional_text(self.instructor.as_deref()),
            description: optional_text(self.description.as_deref()),
            semester_id: self.semester_id,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Editable course fields. The owning semester cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub color: Option<String>,
    pub instructor: Option<String>,
    pub description: Option<String>,
}

impl UpdateCourseRequest {
    pub fn apply(self, course: &mut Course) -> TrackResult<()> {
        if let Some(name) = &self.name {
            course.name = required_text("Course name", name)?;
        }
        if let Some(color) = optional_text(self.color.as_deref()) {
            course.color = color;
        }
        if self.instructor.is_some() {
            course.instructor = optional_text(self.instructor.as_deref());
        }
        if self.description.is_some() {
            course.description = optional_text(self.description.as_deref());
        }
        course.updated_at = Utc::now();
        Ok(())
    }
}
