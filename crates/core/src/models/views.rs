//! Read models returned by the view projector.
//!
//! Definition and course metadata are copied into each payload so a client can
//! render a view without further lookups. Nothing here is ever persisted.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    assignment::Assignment,
    course::Course,
    task_definition::{ScheduleEntry, TaskDefinition, TaskType},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            name: course.name.clone(),
            color: course.color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionSummary {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub description: Option<String>,
    pub length_minutes: Option<i32>,
    pub schedule: Vec<ScheduleEntry>,
}

impl From<&TaskDefinition> for DefinitionSummary {
    fn from(definition: &TaskDefinition) -> Self {
        Self {
            id: definition.id,
            task_type: definition.task_type,
            description: definition.description.clone(),
            length_minutes: definition.length_minutes,
            schedule: definition.schedule.clone(),
        }
    }
}

/// An instance enriched with its definition and course, plus the derived missed flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceView {
    pub id: Uuid,
    pub date: NaiveDateTime,
    pub description: Option<String>,
    pub is_completed: bool,
    pub is_missed: bool,
    pub level_of_understanding: Option<u8>,
    pub task_definition: DefinitionSummary,
    pub course: CourseSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWeek {
    pub course_id: Uuid,
    pub course_name: String,
    pub course_color: String,
    pub instances: Vec<InstanceView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub instance_id: Uuid,
    pub date: NaiveDateTime,
    pub is_completed: bool,
    pub is_missed: bool,
}

/// One definition across the semester; `weeks[i]` holds the instances of week `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    pub task_definition: DefinitionSummary,
    pub weeks: Vec<Vec<GridCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseGrid {
    pub course_id: Uuid,
    pub course_name: String,
    pub course_color: String,
    pub rows: Vec<GridRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterView {
    pub semester_id: Uuid,
    pub semester_name: String,
    pub start_date: NaiveDate,
    pub number_of_weeks: i32,
    /// May fall outside `0..number_of_weeks` when today is outside the semester.
    pub current_week_index: i64,
    pub courses: Vec<CourseGrid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentView {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub course: CourseSummary,
}
