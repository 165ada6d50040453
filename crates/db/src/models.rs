use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use coursetrack_core::models::{
    assignment::Assignment,
    course::Course,
    note::Note,
    semester::Semester,
    task_definition::{ScheduleEntry, TaskDefinition, TaskType},
    task_instance::TaskInstance,
    user::{User, UserCredentials},
};
use eyre::{eyre, Result};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbUser {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            created_at: self.created_at,
        }
    }

    pub fn into_credentials(self) -> UserCredentials {
        let password_hash = self.password_hash.clone();
        UserCredentials {
            user: self.into_user(),
            password_hash,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbSemester {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub number_of_weeks: i32,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbSemester> for Semester {
    fn from(row: DbSemester) -> Self {
        Semester {
            id: row.id,
            name: row.name,
            start_date: row.start_date,
            number_of_weeks: row.number_of_weeks,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbCourse {
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

impl From<DbCourse> for Course {
    fn from(row: DbCourse) -> Self {
        Course {
            id: row.id,
            name: row.name,
            color: row.color,
            instructor: row.instructor,
            description: row.description,
            semester_id: row.semester_id,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The schedule is stored as a JSONB array of `{dayOfWeek, startTime}` objects.
#[derive(Debug, Clone, FromRow)]
pub struct DbTaskDefinition {
    pub id: Uuid,
    pub task_type: String,
    pub instructor: Option<String>,
    pub description: Option<String>,
    pub schedule: Json<Vec<ScheduleEntry>>,
    pub length_minutes: Option<i32>,
    pub course_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbTaskDefinition> for TaskDefinition {
    type Error = eyre::Report;

    fn try_from(row: DbTaskDefinition) -> Result<Self> {
        let task_type: TaskType = row
            .task_type
            .parse()
            .map_err(|_| eyre!("Task definition {} has unknown type '{}'", row.id, row.task_type))?;
        Ok(TaskDefinition {
            id: row.id,
            task_type,
            instructor: row.instructor,
            description: row.description,
            schedule: row.schedule.0,
            length_minutes: row.length_minutes,
            course_id: row.course_id,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbTaskInstance {
    pub id: Uuid,
    pub date: NaiveDateTime,
    pub is_completed: bool,
    pub description: Option<String>,
    pub level_of_understanding: Option<i16>,
    pub task_definition_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbTaskInstance> for TaskInstance {
    type Error = eyre::Report;

    fn try_from(row: DbTaskInstance) -> Result<Self> {
        let level_of_understanding = row
            .level_of_understanding
            .map(u8::try_from)
            .transpose()
            .map_err(|_| eyre!("Task instance {} has an out-of-range understanding level", row.id))?;
        Ok(TaskInstance {
            id: row.id,
            date: row.date,
            is_completed: row.is_completed,
            description: row.description,
            level_of_understanding,
            task_definition_id: row.task_definition_id,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbAssignment {
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

impl From<DbAssignment> for Assignment {
    fn from(row: DbAssignment) -> Self {
        Assignment {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: row.due_date,
            is_completed: row.is_completed,
            course_id: row.course_id,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbNote {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: String,
    pub task_instance_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbNote> for Note {
    fn from(row: DbNote) -> Self {
        Note {
            id: row.id,
            title: row.title,
            description: row.description,
            task_instance_id: row.task_instance_id,
            owner_id: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn definition_row(task_type: &str) -> DbTaskDefinition {
        let now = Utc::now();
        DbTaskDefinition {
            id: Uuid::new_v4(),
            task_type: task_type.to_string(),
            instructor: None,
            description: Some("Weekly lab".to_string()),
            schedule: Json(vec![ScheduleEntry::new(2, "14:00")]),
            length_minutes: Some(120),
            course_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn instance_row(level: Option<i16>) -> DbTaskInstance {
        let now = Utc::now();
        DbTaskInstance {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 9, 3)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            is_completed: false,
            description: None,
            level_of_understanding: level,
            task_definition_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn definition_row_converts() {
        let definition = TaskDefinition::try_from(definition_row("Lab")).unwrap();

        assert_eq!(definition.task_type, TaskType::Lab);
        assert_eq!(definition.schedule, vec![ScheduleEntry::new(2, "14:00")]);
    }

    #[test]
    fn unknown_task_type_is_an_error() {
        assert!(TaskDefinition::try_from(definition_row("Party")).is_err());
    }

    #[test]
    fn instance_level_must_fit() {
        let instance = TaskInstance::try_from(instance_row(Some(7))).unwrap();
        assert_eq!(instance.level_of_understanding, Some(7));

        assert!(TaskInstance::try_from(instance_row(Some(-1))).is_err());
        assert!(TaskInstance::try_from(instance_row(None)).is_ok());
    }
}
