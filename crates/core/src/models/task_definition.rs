use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::optional_text;

/// Kind of recurring class activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    Lecture,
    Lab,
    Tutorial,
    Seminar,
    Workshop,
    Reading,
    Exam,
    Other,
}

impl TaskType {
    pub const ALL: [TaskType; 8] = [
        TaskType::Lecture,
        TaskType::Lab,
        TaskType::Tutorial,
        TaskType::Seminar,
        TaskType::Workshop,
        TaskType::Reading,
        TaskType::Exam,
        TaskType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Lecture => "Lecture",
            TaskType::Lab => "Lab",
            TaskType::Tutorial => "Tutorial",
            TaskType::Seminar => "Seminar",
            TaskType::Workshop => "Workshop",
            TaskType::Reading => "Reading",
            TaskType::Exam => "Exam",
            TaskType::Other => "Other",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TrackError::Validation(format!("Unknown task type: {}", s)))
    }
}

/// One weekly slot of a definition: a weekday (0 = Sunday) and a 24-hour `HH:MM` start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub day_of_week: u8,
    pub start_time: String,
}

impl ScheduleEntry {
    pub fn new(day_of_week: u8, start_time: impl Into<String>) -> Self {
        Self {
            day_of_week,
            start_time: start_time.into(),
        }
    }

    /// Parses `start_time`, accepting only zero-padded `HH:MM`.
    pub fn parsed_start_time(&self) -> Option<NaiveTime> {
        if self.start_time.len() != 5 {
            return None;
        }
        NaiveTime::parse_from_str(&self.start_time, "%H:%M").ok()
    }

    pub fn validate(&self) -> TrackResult<()> {
        if self.day_of_week > 6 {
            return Err(TrackError::Validation(format!(
                "Day of week must be between 0 and 6, got {}",
                self.day_of_week
            )));
        }
        if self.parsed_start_time().is_none() {
            return Err(TrackError::Validation(format!(
                "Start time must be in HH:MM format, got '{}'",
                self.start_time
            )));
        }
        Ok(())
    }
}

pub fn validate_schedule(schedule: &[ScheduleEntry]) -> TrackResult<()> {
    if schedule.is_empty() {
        return Err(TrackError::Validation(
            "Schedule cannot be empty".to_string(),
        ));
    }
    schedule.iter().try_for_each(ScheduleEntry::validate)?;
    for (i, entry) in schedule.iter().enumerate() {
        if schedule[..i].contains(entry) {
            return Err(TrackError::Validation(format!(
                "Schedule lists day {} at {} more than once",
                entry.day_of_week, entry.start_time
            )));
        }
    }
    Ok(())
}

fn validate_length(length_minutes: Option<i32>) -> TrackResult<()> {
    if length_minutes.is_some_and(|l| l < 0) {
        return Err(TrackError::Validation(
            "Length cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// A weekly recurrence rule scoped to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub instructor: Option<String>,
    pub description: Option<String>,
    pub schedule: Vec<ScheduleEntry>,
    pub length_minutes: Option<i32>,
    pub course_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskDefinitionRequest {
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub instructor: Option<String>,
    pub description: Option<String>,
    pub schedule: Vec<ScheduleEntry>,
    pub length_minutes: Option<i32>,
    pub course_id: Uuid,
}

impl CreateTaskDefinitionRequest {
    pub fn validate(&self) -> TrackResult<()> {
        validate_schedule(&self.schedule)?;
        validate_length(self.length_minutes)
    }

    pub fn into_definition(self, owner_id: Uuid) -> TrackResult<TaskDefinition> {
        self.validate()?;
        let now = Utc::now();
        Ok(TaskDefinition {
            id: Uuid::new_v4(),
            task_type: self.task_type,
            instructor: optional_text(self.instructor.as_deref()),
            description: optional_text(self.description.as_deref()),
            schedule: self.schedule,
            length_minutes: self.length_minutes,
            course_id: self.course_id,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Editable definition fields. Course linkage and ownership are fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskDefinitionRequest {
    #[serde(rename = "type")]
    pub task_type: Option<TaskType>,
    pub instructor: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub length_minutes: Option<i32>,
}

impl UpdateTaskDefinitionRequest {
    pub fn validate(&self) -> TrackResult<()> {
        if let Some(schedule) = &self.schedule {
            validate_schedule(schedule)?;
        }
        validate_length(self.length_minutes)
    }

    pub fn apply(self, definition: &mut TaskDefinition) -> TrackResult<()> {
        self.validate()?;
        if let Some(task_type) = self.task_type {
            definition.task_type = task_type;
        }
        if self.instructor.is_some() {
            definition.instructor = optional_text(self.instructor.as_deref());
        }
        if self.description.is_some() {
            definition.description = optional_text(self.description.as_deref());
        }
        if let Some(schedule) = self.schedule {
            definition.schedule = schedule;
        }
        if self.length_minutes.is_some() {
            definition.length_minutes = self.length_minutes;
        }
        definition.updated_at = Utc::now();
        Ok(())
    }
}

/// Outcome of materializing instances after a definition was saved.
///
/// The definition is persisted either way; a `Failed` report means its
/// instances need a resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum GenerationReport {
    Materialized { created: u64, removed: u64 },
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinitionResponse {
    #[serde(flatten)]
    pub definition: TaskDefinition,
    pub generation: GenerationReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("09:00", true)]
    #[case("23:59", true)]
    #[case("00:00", true)]
    #[case("24:00", false)]
    #[case("9:00", false)]
    #[case("09:60", false)]
    #[case("09:00:00", false)]
    #[case("", false)]
    fn start_time_must_be_padded_24h(#[case] start_time: &str, #[case] valid: bool) {
        let entry = ScheduleEntry::new(1, start_time);
        assert_eq!(entry.validate().is_ok(), valid);
    }

    #[test]
    fn rejects_out_of_range_weekday() {
        let err = ScheduleEntry::new(7, "10:00").validate().unwrap_err();
        assert!(matches!(err, TrackError::Validation(_)));
    }

    #[test]
    fn rejects_empty_schedule() {
        assert!(matches!(
            validate_schedule(&[]),
            Err(TrackError::Validation(_))
        ));
    }

    #[test]
    fn rejects_repeated_slot() {
        let schedule = vec![ScheduleEntry::new(1, "10:00"), ScheduleEntry::new(1, "10:00")];
        assert!(matches!(
            validate_schedule(&schedule),
            Err(TrackError::Validation(_))
        ));
        let schedule = vec![ScheduleEntry::new(1, "10:00"), ScheduleEntry::new(1, "14:00")];
        assert!(validate_schedule(&schedule).is_ok());
    }

    #[test]
    fn task_type_round_trips_through_str() {
        for task_type in TaskType::ALL {
            assert_eq!(task_type.as_str().parse::<TaskType>().unwrap(), task_type);
        }
        assert!("Party".parse::<TaskType>().is_err());
    }

    #[test]
    fn definition_serializes_type_field() {
        let request: CreateTaskDefinitionRequest = serde_json::from_value(serde_json::json!({
            "type": "Lab",
            "schedule": [{ "dayOfWeek": 2, "startTime": "14:00" }],
            "lengthMinutes": 120,
            "courseId": Uuid::nil(),
        }))
        .unwrap();
        assert_eq!(request.task_type, TaskType::Lab);
        assert_eq!(request.schedule, vec![ScheduleEntry::new(2, "14:00")]);

        let definition = request.into_definition(Uuid::new_v4()).unwrap();
        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(json["type"], "Lab");
        assert_eq!(json["lengthMinutes"], 120);
    }

    #[test]
    fn report_is_tagged_by_status() {
        let json = serde_json::to_value(GenerationReport::Materialized {
            created: 28,
            removed: 0,
        })
        .unwrap();
        assert_eq!(json["status"], "materialized");
        assert_eq!(json["created"], 28);
    }
}
