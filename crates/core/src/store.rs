//! The persistence port.
//!
//! Every read and write is scoped by the caller's owner id; an entity owned by
//! someone else is indistinguishable from one that does not exist. Adapters
//! live outside this crate (`coursetrack-db` for PostgreSQL) apart from the
//! in-process [`crate::memory::InMemoryStore`].

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::errors::TrackResult;
use crate::models::{
    assignment::{Assignment, AssignmentFilter},
    course::Course,
    note::Note,
    semester::Semester,
    task_definition::TaskDefinition,
    task_instance::{InstanceFilter, NewTaskInstance, TaskInstance},
    user::{NewUser, User, UserCredentials},
};

/// Counts reported by [`PlannerStore::replace_instances_from`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub removed: u64,
    pub created: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlannerStore: Send + Sync {
    // --- Identity ---

    /// Returns `None` when the email is already registered.
    async fn create_user(&self, user: &NewUser) -> TrackResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> TrackResult<Option<UserCredentials>>;

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> TrackResult<()>;

    /// Resolves a session token that has not expired at `now`.
    async fn get_session_owner(&self, token: &str, now: DateTime<Utc>)
        -> TrackResult<Option<Uuid>>;

    async fn delete_session(&self, token: &str) -> TrackResult<()>;

    // --- Semesters ---

    async fn insert_semester(&self, semester: &Semester) -> TrackResult<()>;

    async fn get_semester(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Semester>>;

    /// Newest start date first.
    async fn list_semesters(&self, owner_id: Uuid) -> TrackResult<Vec<Semester>>;

    async fn update_semester(&self, semester: &Semester) -> TrackResult<bool>;

    async fn delete_semester(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool>;

    // --- Courses ---

    async fn insert_course(&self, course: &Course) -> TrackResult<()>;

    async fn get_course(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Course>>;

    /// Alphabetical by name.
    async fn list_courses(&self, owner_id: Uuid, semester_id: Uuid) -> TrackResult<Vec<Course>>;

    async fn get_courses(&self, owner_id: Uuid, ids: &[Uuid]) -> TrackResult<Vec<Course>>;

    async fn update_course(&self, course: &Course) -> TrackResult<bool>;

    async fn delete_course(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool>;

    // --- Task definitions ---

    async fn insert_definition(&self, definition: &TaskDefinition) -> TrackResult<()>;

    async fn get_definition(&self, owner_id: Uuid, id: Uuid)
        -> TrackResult<Option<TaskDefinition>>;

    async fn list_definitions(
        &self,
        owner_id: Uuid,
        course_ids: &[Uuid],
    ) -> TrackResult<Vec<TaskDefinition>>;

    async fn get_definitions(&self, owner_id: Uuid, ids: &[Uuid])
        -> TrackResult<Vec<TaskDefinition>>;

    async fn update_definition(&self, definition: &TaskDefinition) -> TrackResult<bool>;

    async fn delete_definition(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool>;

    // --- Task instances ---

    /// Returns `None` when an instance already occupies the same definition and date.
    async fn insert_instance(&self, instance: &NewTaskInstance)
        -> TrackResult<Option<TaskInstance>>;

    /// Bulk insert that skips rows clashing on `(task_definition_id, date)`.
    /// Returns the number of rows actually inserted.
    async fn insert_instances(&self, instances: &[NewTaskInstance]) -> TrackResult<u64>;

    /// Atomically removes the definition's instances dated at or after `from`
    /// and inserts `instances` with the same duplicate tolerance as
    /// [`PlannerStore::insert_instances`].
    async fn replace_instances_from(
        &self,
        owner_id: Uuid,
        task_definition_id: Uuid,
        from: NaiveDateTime,
        instances: &[NewTaskInstance],
    ) -> TrackResult<ReplaceOutcome>;

    async fn get_instance(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<TaskInstance>>;

    /// Ordered by date ascending.
    async fn list_instances(
        &self,
        owner_id: Uuid,
        filter: &InstanceFilter,
    ) -> TrackResult<Vec<TaskInstance>>;

    async fn update_instance(&self, instance: &TaskInstance) -> TrackResult<bool>;

    /// Removes the instance and its notes.
    async fn delete_instance(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool>;

    /// Removes every instance of the given definitions, with their notes.
    async fn delete_instances_for_definitions(
        &self,
        owner_id: Uuid,
        task_definition_ids: &[Uuid],
    ) -> TrackResult<u64>;

    // --- Assignments ---

    async fn insert_assignment(&self, assignment: &Assignment) -> TrackResult<()>;

    async fn get_assignment(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Assignment>>;

    /// Ordered by due date ascending.
    async fn list_assignments(
        &self,
        owner_id: Uuid,
        filter: &AssignmentFilter,
    ) -> TrackResult<Vec<Assignment>>;

    async fn update_assignment(&self, assignment: &Assignment) -> TrackResult<bool>;

    async fn delete_assignment(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool>;

    async fn delete_assignments_for_courses(
        &self,
        owner_id: Uuid,
        course_ids: &[Uuid],
    ) -> TrackResult<u64>;

    // --- Notes ---

    async fn insert_note(&self, note: &Note) -> TrackResult<()>;

    async fn get_note(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Note>>;

    async fn list_notes(&self, owner_id: Uuid, task_instance_id: Uuid) -> TrackResult<Vec<Note>>;

    async fn update_note(&self, note: &Note) -> TrackResult<bool>;

    async fn delete_note(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool>;
}
