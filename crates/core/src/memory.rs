//! In-process [`PlannerStore`] backed by hash maps behind a single lock.
//!
//! Holds the same guarantees as the PostgreSQL adapter (owner scoping,
//! duplicate-tolerant instance inserts, atomic replace) so it can stand in for
//! the database in tests.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use eyre::eyre;
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::{
    assignment::{Assignment, AssignmentFilter},
    course::Course,
    note::Note,
    semester::Semester,
    task_definition::TaskDefinition,
    task_instance::{InstanceFilter, NewTaskInstance, TaskInstance},
    user::{NewUser, User, UserCredentials},
};
use crate::store::{PlannerStore, ReplaceOutcome};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserCredentials>,
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    semesters: HashMap<Uuid, Semester>,
    courses: HashMap<Uuid, Course>,
    definitions: HashMap<Uuid, TaskDefinition>,
    instances: HashMap<Uuid, TaskInstance>,
    /// Occupied `(task_definition_id, date)` slots across `instances`.
    slots: HashSet<(Uuid, NaiveDateTime)>,
    assignments: HashMap<Uuid, Assignment>,
    notes: HashMap<Uuid, Note>,
}

impl Tables {
    fn insert_new_instance(&mut self, instance: &NewTaskInstance) -> Option<TaskInstance> {
        if !self
            .slots
            .insert((instance.task_definition_id, instance.date))
        {
            return None;
        }
        let stored = instance.clone().into_instance();
        self.instances.insert(stored.id, stored.clone());
        Some(stored)
    }

    fn remove_instances(&mut self, ids: &[Uuid]) -> u64 {
        let ids: HashSet<&Uuid> = ids.iter().collect();
        self.notes
            .retain(|_, note| !ids.contains(&note.task_instance_id));
        let mut removed = 0;
        for id in ids {
            if let Some(instance) = self.instances.remove(id) {
                self.slots
                    .remove(&(instance.task_definition_id, instance.date));
                removed += 1;
            }
        }
        removed
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TrackResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| TrackError::Database(eyre!("in-memory store lock poisoned")))
    }

    fn write(&self) -> TrackResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| TrackError::Database(eyre!("in-memory store lock poisoned")))
    }
}

fn owned<T: Clone>(
    map: &HashMap<Uuid, T>,
    id: Uuid,
    owner_id: Uuid,
    owner_of: impl Fn(&T) -> Uuid,
) -> Option<T> {
    map.get(&id).filter(|v| owner_of(v) == owner_id).cloned()
}

fn replace_owned<T: Clone>(
    map: &mut HashMap<Uuid, T>,
    id: Uuid,
    owner_id: Uuid,
    value: &T,
    owner_of: impl Fn(&T) -> Uuid,
) -> bool {
    match map.get_mut(&id) {
        Some(existing) if owner_of(existing) == owner_id => {
            *existing = value.clone();
            true
        }
        _ => false,
    }
}

fn remove_owned<T>(
    map: &mut HashMap<Uuid, T>,
    id: Uuid,
    owner_id: Uuid,
    owner_of: impl Fn(&T) -> Uuid,
) -> bool {
    if map.get(&id).is_some_and(|v| owner_of(v) == owner_id) {
        map.remove(&id);
        true
    } else {
        false
    }
}

#[async_trait]
impl PlannerStore for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> TrackResult<Option<User>> {
        let mut tables = self.write()?;
        if tables.users.values().any(|c| c.user.email == user.email) {
            return Ok(None);
        }
        let created = User {
            id: Uuid::new_v4(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: Utc::now(),
        };
        tables.users.insert(
            created.id,
            UserCredentials {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(Some(created))
    }

    async fn get_user_by_email(&self, email: &str) -> TrackResult<Option<UserCredentials>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|c| c.user.email == email)
            .cloned())
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> TrackResult<()> {
        self.write()?
            .sessions
            .insert(token.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn get_session_owner(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> TrackResult<Option<Uuid>> {
        Ok(self
            .read()?
            .sessions
            .get(token)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(user_id, _)| *user_id))
    }

    async fn delete_session(&self, token: &str) -> TrackResult<()> {
        self.write()?.sessions.remove(token);
        Ok(())
    }

    async fn insert_semester(&self, semester: &Semester) -> TrackResult<()> {
        self.write()?.semesters.insert(semester.id, semester.clone());
        Ok(())
    }

    async fn get_semester(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Semester>> {
        Ok(owned(&self.read()?.semesters, id, owner_id, |s| s.owner_id))
    }

    async fn list_semesters(&self, owner_id: Uuid) -> TrackResult<Vec<Semester>> {
        let mut semesters: Vec<Semester> = self
            .read()?
            .semesters
            .values()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        semesters.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.id.cmp(&b.id)));
        Ok(semesters)
    }

    async fn update_semester(&self, semester: &Semester) -> TrackResult<bool> {
        Ok(replace_owned(
            &mut self.write()?.semesters,
            semester.id,
            semester.owner_id,
            semester,
            |s| s.owner_id,
        ))
    }

    async fn delete_semester(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(remove_owned(&mut self.write()?.semesters, id, owner_id, |s| {
            s.owner_id
        }))
    }

    async fn insert_course(&self, course: &Course) -> TrackResult<()> {
        self.write()?.courses.insert(course.id, course.clone());
        Ok(())
    }

    async fn get_course(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Course>> {
        Ok(owned(&self.read()?.courses, id, owner_id, |c| c.owner_id))
    }

    async fn list_courses(&self, owner_id: Uuid, semester_id: Uuid) -> TrackResult<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .read()?
            .courses
            .values()
            .filter(|c| c.owner_id == owner_id && c.semester_id == semester_id)
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(courses)
    }

    async fn get_courses(&self, owner_id: Uuid, ids: &[Uuid]) -> TrackResult<Vec<Course>> {
        let tables = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| owned(&tables.courses, *id, owner_id, |c| c.owner_id))
            .collect())
    }

    async fn update_course(&self, course: &Course) -> TrackResult<bool> {
        Ok(replace_owned(
            &mut self.write()?.courses,
            course.id,
            course.owner_id,
            course,
            |c| c.owner_id,
        ))
    }

    async fn delete_course(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(remove_owned(&mut self.write()?.courses, id, owner_id, |c| {
            c.owner_id
        }))
    }

    async fn insert_definition(&self, definition: &TaskDefinition) -> TrackResult<()> {
        self.write()?
            .definitions
            .insert(definition.id, definition.clone());
        Ok(())
    }

    async fn get_definition(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> TrackResult<Option<TaskDefinition>> {
        Ok(owned(&self.read()?.definitions, id, owner_id, |d| d.owner_id))
    }

    async fn list_definitions(
        &self,
        owner_id: Uuid,
        course_ids: &[Uuid],
    ) -> TrackResult<Vec<TaskDefinition>> {
        let mut definitions: Vec<TaskDefinition> = self
            .read()?
            .definitions
            .values()
            .filter(|d| d.owner_id == owner_id && course_ids.contains(&d.course_id))
            .cloned()
            .collect();
        definitions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(definitions)
    }

    async fn get_definitions(
        &self,
        owner_id: Uuid,
        ids: &[Uuid],
    ) -> TrackResult<Vec<TaskDefinition>> {
        let tables = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| owned(&tables.definitions, *id, owner_id, |d| d.owner_id))
            .collect())
    }

    async fn update_definition(&self, definition: &TaskDefinition) -> TrackResult<bool> {
        Ok(replace_owned(
            &mut self.write()?.definitions,
            definition.id,
            definition.owner_id,
            definition,
            |d| d.owner_id,
        ))
    }

    async fn delete_definition(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(remove_owned(&mut self.write()?.definitions, id, owner_id, |d| {
            d.owner_id
        }))
    }

    async fn insert_instance(
        &self,
        instance: &NewTaskInstance,
    ) -> TrackResult<Option<TaskInstance>> {
        Ok(self.write()?.insert_new_instance(instance))
    }

    async fn insert_instances(&self, instances: &[NewTaskInstance]) -> TrackResult<u64> {
        let mut tables = self.write()?;
        Ok(instances
            .iter()
            .filter(|instance| tables.insert_new_instance(instance).is_some())
            .count() as u64)
    }

    async fn replace_instances_from(
        &self,
        owner_id: Uuid,
        task_definition_id: Uuid,
        from: NaiveDateTime,
        instances: &[NewTaskInstance],
    ) -> TrackResult<ReplaceOutcome> {
        let mut tables = self.write()?;
        let stale: Vec<Uuid> = tables
            .instances
            .values()
            .filter(|i| {
                i.owner_id == owner_id
                    && i.task_definition_id == task_definition_id
                    && i.date >= from
            })
            .map(|i| i.id)
            .collect();
        let removed = tables.remove_instances(&stale);
        let created = instances
            .iter()
            .filter(|instance| tables.insert_new_instance(instance).is_some())
            .count() as u64;
        Ok(ReplaceOutcome { removed, created })
    }

    async fn get_instance(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<TaskInstance>> {
        Ok(owned(&self.read()?.instances, id, owner_id, |i| i.owner_id))
    }

    async fn list_instances(
        &self,
        owner_id: Uuid,
        filter: &InstanceFilter,
    ) -> TrackResult<Vec<TaskInstance>> {
        let mut instances: Vec<TaskInstance> = self
            .read()?
            .instances
            .values()
            .filter(|i| i.owner_id == owner_id && filter.matches(i))
            .cloned()
            .collect();
        instances.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Ok(instances)
    }

    async fn update_instance(&self, instance: &TaskInstance) -> TrackResult<bool> {
        Ok(replace_owned(
            &mut self.write()?.instances,
            instance.id,
            instance.owner_id,
            instance,
            |i| i.owner_id,
        ))
    }

    async fn delete_instance(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        let mut tables = self.write()?;
        if owned(&tables.instances, id, owner_id, |i| i.owner_id).is_none() {
            return Ok(false);
        }
        Ok(tables.remove_instances(&[id]) == 1)
    }

    async fn delete_instances_for_definitions(
        &self,
        owner_id: Uuid,
        task_definition_ids: &[Uuid],
    ) -> TrackResult<u64> {
        let mut tables = self.write()?;
        let doomed: Vec<Uuid> = tables
            .instances
            .values()
            .filter(|i| {
                i.owner_id == owner_id && task_definition_ids.contains(&i.task_definition_id)
            })
            .map(|i| i.id)
            .collect();
        Ok(tables.remove_instances(&doomed))
    }

    async fn insert_assignment(&self, assignment: &Assignment) -> TrackResult<()> {
        self.write()?
            .assignments
            .insert(assignment.id, assignment.clone());
        Ok(())
    }

    async fn get_assignment(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Assignment>> {
        Ok(owned(&self.read()?.assignments, id, owner_id, |a| a.owner_id))
    }

    async fn list_assignments(
        &self,
        owner_id: Uuid,
        filter: &AssignmentFilter,
    ) -> TrackResult<Vec<Assignment>> {
        let mut assignments: Vec<Assignment> = self
            .read()?
            .assignments
            .values()
            .filter(|a| a.owner_id == owner_id && filter.matches(a))
            .cloned()
            .collect();
        assignments.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
        Ok(assignments)
    }

    async fn update_assignment(&self, assignment: &Assignment) -> TrackResult<bool> {
        Ok(replace_owned(
            &mut self.write()?.assignments,
            assignment.id,
            assignment.owner_id,
            assignment,
            |a| a.owner_id,
        ))
    }

    async fn delete_assignment(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(remove_owned(&mut self.write()?.assignments, id, owner_id, |a| {
            a.owner_id
        }))
    }

    async fn delete_assignments_for_courses(
        &self,
        owner_id: Uuid,
        course_ids: &[Uuid],
    ) -> TrackResult<u64> {
        let mut tables = self.write()?;
        let before = tables.assignments.len();
        tables
            .assignments
            .retain(|_, a| !(a.owner_id == owner_id && course_ids.contains(&a.course_id)));
        Ok((before - tables.assignments.len()) as u64)
    }

    async fn insert_note(&self, note: &Note) -> TrackResult<()> {
        self.write()?.notes.insert(note.id, note.clone());
        Ok(())
    }

    async fn get_note(&self, owner_id: Uuid, id: Uuid) -> TrackResult<Option<Note>> {
        Ok(owned(&self.read()?.notes, id, owner_id, |n| n.owner_id))
    }

    async fn list_notes(&self, owner_id: Uuid, task_instance_id: Uuid) -> TrackResult<Vec<Note>> {
        let mut notes: Vec<Note> = self
            .read()?
            .notes
            .values()
            .filter(|n| n.owner_id == owner_id && n.task_instance_id == task_instance_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(notes)
    }

    async fn update_note(&self, note: &Note) -> TrackResult<bool> {
        Ok(replace_owned(
            &mut self.write()?.notes,
            note.id,
            note.owner_id,
            note,
            |n| n.owner_id,
        ))
    }

    async fn delete_note(&self, owner_id: Uuid, id: Uuid) -> TrackResult<bool> {
        Ok(remove_owned(&mut self.write()?.notes, id, owner_id, |n| {
            n.owner_id
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_slots_are_skipped() {
        let store = InMemoryStore::new();
        let (owner, definition) = (Uuid::new_v4(), Uuid::new_v4());
        let batch = vec![
            NewTaskInstance::pending(definition, owner, at(2, 10)),
            NewTaskInstance::pending(definition, owner, at(2, 10)),
            NewTaskInstance::pending(definition, owner, at(4, 10)),
        ];

        assert_eq!(store.insert_instances(&batch).await.unwrap(), 2);
        assert_eq!(store.insert_instances(&batch).await.unwrap(), 0);

        let other = NewTaskInstance::pending(Uuid::new_v4(), owner, at(2, 10));
        assert!(store.insert_instance(&other).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn removed_slots_can_be_reused() {
        let store = InMemoryStore::new();
        let (owner, definition) = (Uuid::new_v4(), Uuid::new_v4());
        let slot = NewTaskInstance::pending(definition, owner, at(2, 10));

        let stored = store.insert_instance(&slot).await.unwrap().unwrap();
        assert!(store.insert_instance(&slot).await.unwrap().is_none());

        assert!(store.delete_instance(owner, stored.id).await.unwrap());
        assert!(store.insert_instance(&slot).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn replace_frees_and_refills_future_slots() {
        let store = InMemoryStore::new();
        let (owner, definition) = (Uuid::new_v4(), Uuid::new_v4());
        let original = vec![
            NewTaskInstance::pending(definition, owner, at(2, 10)),
            NewTaskInstance::pending(definition, owner, at(9, 10)),
        ];
        store.insert_instances(&original).await.unwrap();

        let outcome = store
            .replace_instances_from(owner, definition, at(5, 0), &original)
            .await
            .unwrap();

        assert_eq!(outcome, ReplaceOutcome { removed: 1, created: 1 });
        let all = store
            .list_instances(owner, &InstanceFilter::for_definitions(vec![definition]))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }
}
