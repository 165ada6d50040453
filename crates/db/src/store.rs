//! [`PlannerStore`] over PostgreSQL.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use coursetrack_core::errors::TrackResult;
use coursetrack_core::models::{
    assignment::{Assignment, AssignmentFilter},
    course::Course,
    note::Note,
    semester::Semester,
    task_definition::TaskDefinition,
    task_instance::{InstanceFilter, NewTaskInstance, TaskInstance},
    user::{NewUser, User, UserCredentials},
};
use coursetrack_core::store::{PlannerStore, ReplaceOutcome};
use uuid::Uuid;

use crate::repositories::{
    assignments, courses, notes, semesters, task_definitions, task_instances, users,
};
use crate::DbPool;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> TrackResult<Vec<T>>
where
    T: TryFrom<R, Error = eyre::Report>,
{
    Ok(rows
        .into_iter()
        .map(T::try_from)
        .collect::<eyre::Result<Vec<T>>>()?)
}

#[async_trait]
impl PlannerStore for PgStore {
    async fn create_user(&self, user: &NewUser) -> TrackResult<Option<User>> {
        let row = users::create_user(
            &self.pool,
            &user.email,
            &user.password_hash,
            user.name.as_deref(),
        )
        .await?;
        Ok(row.map(|r| r.into_user()))
    }

    async fn get_user_by_email(&self, email: &str) -> TrackResult<Option<UserCredentials>> {
        let row = users::get_user_by_email(&self.pool, email).await?;
        Ok(row.map(|r| r.into_credentials()))
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> TrackResult<()> {
        Ok(users::create_session(&self.pool, token, user_id, expires_at).await?)
    }

    async fn get_session_owner(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> TrackResult<Option<Uuid>> {
        Ok(users::get_session_owner(&self.pool, token, now).await?)
    }

    async fn delete_session(&self, token: &str) -> TrackResult<()> {
        Ok(users::delete_session(&self.pool, token).await?)
    }

    async fn insert_semester(&self, semester: &Semester) -> TrackResult<()> {
        Ok(semesters::insert_semester(&self.pool, semester).await?)
    }

    async fn get_semester(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Semester>> {
        let row = semesters::get_semester(&self.pool, owner_id, id).await?;
        Ok(row.map(Semester::from))
    }

    async fn list_semesters(&self, owner_id: Uuid) -> TrackResult<Vec<Semester>> {
        let rows = semesters::list_semesters(&self.pool, owner_id).await?;
        Ok(rows.into_iter().map(Semester::from).collect())
    }

    async fn update_semester(&self, semester: &Semester) -> TrackResult<bool> {
        Ok(semesters::update_semester(&self.pool, semester).await?)
    }

    async fn delete_semester(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(semesters::delete_semester(&self.pool, owner_id, id).await?)
    }

    async fn insert_course(&self, course: &Course) -> TrackResult<()> {
        Ok(courses::insert_course(&self.pool, course).await?)
    }

    async fn get_course(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Course>> {
        let row = courses::get_course(&self.pool, owner_id, id).await?;
        Ok(row.map(Course::from))
    }

    async fn list_courses(&self, owner_id: Uuid, semester_id: Uuid) -> TrackResult<Vec<Course>> {
        let rows = courses::list_courses(&self.pool, owner_id, semester_id).await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn get_courses(&self, owner_id: Uuid, ids: &[Uuid]) -> TrackResult<Vec<Course>> {
        let rows = courses::get_courses(&self.pool, owner_id, ids).await?;
        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn update_course(&self, course: &Course) -> TrackResult<bool> {
        Ok(courses::update_course(&self.pool, course).await?)
    }

    async fn delete_course(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(courses::delete_course(&self.pool, owner_id, id).await?)
    }

    async fn insert_definition(&self, definition: &TaskDefinition) -> TrackResult<()> {
        Ok(task_definitions::insert_definition(&self.pool, definition).await?)
    }

    async fn get_definition(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> TrackResult<Option<TaskDefinition>> {
        let row = task_definitions::get_definition(&self.pool, owner_id, id).await?;
        Ok(row.map(TaskDefinition::try_from).transpose()?)
    }

    async fn list_definitions(
        &self,
        owner_id: Uuid,
        course_ids: &[Uuid],
    ) -> TrackResult<Vec<TaskDefinition>> {
        let rows = task_definitions::list_definitions(&self.pool, owner_id, course_ids).await?;
        convert_all(rows)
    }

    async fn get_definitions(
        &self,
        owner_id: Uuid,
        ids: &[Uuid],
    ) -> TrackResult<Vec<TaskDefinition>> {
        let rows = task_definitions::get_definitions(&self.pool, owner_id, ids).await?;
        convert_all(rows)
    }

    async fn update_definition(&self, definition: &TaskDefinition) -> TrackResult<bool> {
        Ok(task_definitions::update_definition(&self.pool, definition).await?)
    }

    async fn delete_definition(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(task_definitions::delete_definition(&self.pool, owner_id, id).await?)
    }

    async fn insert_instance(
        &self,
        instance: &NewTaskInstance,
    ) -> TrackResult<Option<TaskInstance>> {
        let row = task_instances::insert_instance(&self.pool, instance).await?;
        Ok(row.map(TaskInstance::try_from).transpose()?)
    }

    async fn insert_instances(&self, instances: &[NewTaskInstance]) -> TrackResult<u64> {
        Ok(task_instances::insert_instances(&self.pool, instances).await?)
    }

    async fn replace_instances_from(
        &self,
        owner_id: Uuid,
        task_definition_id: Uuid,
        from: NaiveDateTime,
        instances: &[NewTaskInstance],
    ) -> TrackResult<ReplaceOutcome> {
        let (removed, created) = task_instances::replace_instances_from(
            &self.pool,
            owner_id,
            task_definition_id,
            from,
            instances,
        )
        .await?;
        Ok(ReplaceOutcome { removed, created })
    }

    async fn get_instance(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<TaskInstance>> {
        let row = task_instances::get_instance(&self.pool, owner_id, id).await?;
        Ok(row.map(TaskInstance::try_from).transpose()?)
    }

    async fn list_instances(
        &self,
        owner_id: Uuid,
        filter: &InstanceFilter,
    ) -> TrackResult<Vec<TaskInstance>> {
        let rows = task_instances::list_instances(&self.pool, owner_id, filter).await?;
        convert_all(rows)
    }

    async fn update_instance(&self, instance: &TaskInstance) -> TrackResult<bool> {
        Ok(task_instances::update_instance(&self.pool, instance).await?)
    }

    async fn delete_instance(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(task_instances::delete_instance(&self.pool, owner_id, id).await?)
    }

    async fn delete_instances_for_definitions(
        &self,
        owner_id: Uuid,
        task_definition_ids: &[Uuid],
    ) -> TrackResult<u64> {
        Ok(
            task_instances::delete_instances_for_definitions(
                &self.pool,
                owner_id,
                task_definition_ids,
            )
            .await?,
        )
    }

    async fn insert_assignment(&self, assignment: &Assignment) -> TrackResult<()> {
        Ok(assignments::insert_assignment(&self.pool, assignment).await?)
    }

    async fn get_assignment(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Assignment>> {
        let row = assignments::get_assignment(&self.pool, owner_id, id).await?;
        Ok(row.map(Assignment::from))
    }

    async fn list_assignments(
        &self,
        owner_id: Uuid,
        filter: &AssignmentFilter,
    ) -> TrackResult<Vec<Assignment>> {
        let rows = assignments::list_assignments(&self.pool, owner_id, filter).await?;
        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    async fn update_assignment(&self, assignment: &Assignment) -> TrackResult<bool> {
        Ok(assignments::update_assignment(&self.pool, assignment).await?)
    }

    async fn delete_assignment(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(assignments::delete_assignment(&self.pool, owner_id, id).await?)
    }

    async fn delete_assignments_for_courses(
        &self,
        owner_id: Uuid,
        course_ids: &[Uuid],
    ) -> TrackResult<u64> {
        Ok(assignments::delete_assignments_for_courses(&self.pool, owner_id, course_ids).await?)
    }

    async fn insert_note(&self, note: &Note) -> TrackResult<()> {
        Ok(notes::insert_note(&self.pool, note).await?)
    }

    async fn get_note(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Note>> {
        let row = notes::get_note(&self.pool, owner_id, id).await?;
        Ok(row.map(Note::from))
    }

    async fn list_notes(&self, owner_id: Uuid, task_instance_id: Uuid) -> TrackResult<Vec<Note>> {
        let rows = notes::list_notes(&self.pool, owner_id, task_instance_id).await?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn update_note(&self, note: &Note) -> TrackResult<bool> {
        Ok(notes::update_note(&self.pool, note).await?)
    }

    async fn delete_note(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(notes::delete_note(&self.pool, owner_id, id).await?)
    }
}
