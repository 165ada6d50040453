//! Keeps stored instances in step with their task definitions.
//!
//! Called synchronously from the definition, course and semester services.
//! A definition is always persisted before its instances are materialized, so
//! the create and update hooks report failures instead of returning them.

use chrono::NaiveDate;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::generator;
use crate::models::{
    course::Course,
    semester::Semester,
    task_definition::{GenerationReport, TaskDefinition},
};
use crate::store::{PlannerStore, ReplaceOutcome};
use crate::time;

async fn load_parents(
    store: &dyn PlannerStore,
    definition: &TaskDefinition,
) -> TrackResult<(Course, Semester)> {
    let course = store
        .get_course(definition.owner_id, definition.course_id)
        .await?
        .ok_or_else(|| {
            TrackError::GenerationFailure(format!(
                "Course {} for task definition {} is not available",
                definition.course_id, definition.id
            ))
        })?;
    let semester = store
        .get_semester(definition.owner_id, course.semester_id)
        .await?
        .ok_or_else(|| {
            TrackError::GenerationFailure(format!(
                "Semester {} for course {} is not available",
                course.semester_id, course.id
            ))
        })?;
    Ok((course, semester))
}

/// Generates and stores instances over the definition's whole semester.
/// Slots that already hold an instance are skipped.
pub async fn materialize(store: &dyn PlannerStore, definition: &TaskDefinition) -> TrackResult<u64> {
    let (course, semester) = load_parents(store, definition).await?;
    let records = generator::generate(definition, &course, &semester)?;
    store.insert_instances(&records).await
}

/// Replaces every instance dated today or later with a freshly generated set.
/// Earlier instances, and their completion state, are left untouched.
pub async fn resync(
    store: &dyn PlannerStore,
    definition: &TaskDefinition,
    today: NaiveDate,
) -> TrackResult<ReplaceOutcome> {
    let (course, semester) = load_parents(store, definition).await?;
    let from = time::start_of_day(today);
    let mut records = generator::generate(definition, &course, &semester)?;
    records.retain(|record| record.date >= from);
    store
        .replace_instances_from(definition.owner_id, definition.id, from, &records)
        .await
}

/// Materializes a newly created definition.
pub async fn on_create(store: &dyn PlannerStore, definition: &TaskDefinition) -> GenerationReport {
    match materialize(store, definition).await {
        Ok(created) => {
            info!(
                "Materialized {} instances for task definition {}",
                created, definition.id
            );
            GenerationReport::Materialized { created, removed: 0 }
        }
        Err(e) => {
            error!(
                "Failed to materialize instances for task definition {}: {}",
                definition.id, e
            );
            GenerationReport::Failed {
                message: e.to_string(),
            }
        }
    }
}

/// Re-synchronizes an edited definition from the start of `today`.
pub async fn on_update(
    store: &dyn PlannerStore,
    definition: &TaskDefinition,
    today: NaiveDate,
) -> GenerationReport {
    match resync(store, definition, today).await {
        Ok(ReplaceOutcome { removed, created }) => {
            info!(
                "Regenerated task definition {}: removed {}, created {}",
                definition.id, removed, created
            );
            GenerationReport::Materialized { created, removed }
        }
        Err(e) => {
            error!(
                "Failed to regenerate instances for task definition {}: {}",
                definition.id, e
            );
            GenerationReport::Failed {
                message: e.to_string(),
            }
        }
    }
}

/// Removes a definition together with all of its instances, past and future.
pub async fn delete_definition(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    definition_id: Uuid,
) -> TrackResult<bool> {
    let removed = store
        .delete_instances_for_definitions(owner_id, &[definition_id])
        .await?;
    let deleted = store.delete_definition(owner_id, definition_id).await?;
    if deleted {
        info!(
            "Deleted task definition {} and {} instances",
            definition_id, removed
        );
    }
    Ok(deleted)
}

/// Course cascade: instances, then definitions, then assignments, then the course.
pub async fn delete_course(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    course_id: Uuid,
) -> TrackResult<bool> {
    let definitions = store.list_definitions(owner_id, &[course_id]).await?;
    let definition_ids: Vec<Uuid> = definitions.iter().map(|d| d.id).collect();

    let instances = if definition_ids.is_empty() {
        0
    } else {
        store
            .delete_instances_for_definitions(owner_id, &definition_ids)
            .await?
    };
    for id in &definition_ids {
        store.delete_definition(owner_id, *id).await?;
    }
    let assignments = store
        .delete_assignments_for_courses(owner_id, &[course_id])
        .await?;
    let deleted = store.delete_course(owner_id, course_id).await?;

    if deleted {
        info!(
            "Deleted course {} with {} definitions, {} instances and {} assignments",
            course_id,
            definition_ids.len(),
            instances,
            assignments
        );
    }
    Ok(deleted)
}

pub async fn delete_semester(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    semester_id: Uuid,
) -> TrackResult<bool> {
    let courses = store.list_courses(owner_id, semester_id).await?;
    for course in &courses {
        delete_course(store, owner_id, course.id).await?;
    }
    let deleted = store.delete_semester(owner_id, semester_id).await?;
    if deleted {
        info!(
            "Deleted semester {} with {} courses",
            semester_id,
            courses.len()
        );
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        course::CreateCourseRequest,
        semester::CreateSemesterRequest,
        task_definition::{CreateTaskDefinitionRequest, ScheduleEntry, TaskType},
        task_instance::NewTaskInstance,
    };
    use crate::store::MockPlannerStore;
    use chrono::NaiveDateTime;
    use eyre::eyre;
    use pretty_assertions::assert_eq;

    fn fixture() -> (TaskDefinition, Course, Semester) {
        let owner = Uuid::new_v4();
        let semester = CreateSemesterRequest {
            name: "Spring".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            number_of_weeks: 2,
        }
        .into_semester(owner)
        .unwrap();
        let course = CreateCourseRequest {
            name: "Databases".into(),
            color: None,
            instructor: None,
            description: None,
            semester_id: semester.id,
        }
        .into_course(owner)
        .unwrap();
        let definition = CreateTaskDefinitionRequest {
            task_type: TaskType::Lab,
            instructor: None,
            description: None,
            schedule: vec![ScheduleEntry::new(2, "14:00")],
            length_minutes: None,
            course_id: course.id,
        }
        .into_definition(owner)
        .unwrap();
        (definition, course, semester)
    }

    fn store_with(course: Course, semester: Semester) -> MockPlannerStore {
        let mut store = MockPlannerStore::new();
        store
            .expect_get_course()
            .returning(move |_, _| Ok(Some(course.clone())));
        store
            .expect_get_semester()
            .returning(move |_, _| Ok(Some(semester.clone())));
        store
    }

    #[test_log::test(tokio::test)]
    async fn create_reports_inserted_count() {
        let (definition, course, semester) = fixture();
        let mut store = store_with(course, semester);
        store
            .expect_insert_instances()
            .withf(|records: &[NewTaskInstance]| records.len() == 2)
            .times(1)
            .returning(|records| Ok(records.len() as u64));

        let report = on_create(&store, &definition).await;

        assert_eq!(
            report,
            GenerationReport::Materialized {
                created: 2,
                removed: 0
            }
        );
    }

    #[test_log::test(tokio::test)]
    async fn create_survives_store_failure() {
        let (definition, course, semester) = fixture();
        let mut store = store_with(course, semester);
        store
            .expect_insert_instances()
            .returning(|_| Err(TrackError::Database(eyre!("connection reset"))));

        let report = on_create(&store, &definition).await;

        assert!(matches!(report, GenerationReport::Failed { message } if message.contains("connection reset")));
    }

    #[test_log::test(tokio::test)]
    async fn create_reports_missing_course() {
        let (definition, _, _) = fixture();
        let mut store = MockPlannerStore::new();
        store.expect_get_course().returning(|_, _| Ok(None));
        store.expect_insert_instances().never();

        let report = on_create(&store, &definition).await;

        assert!(matches!(report, GenerationReport::Failed { .. }));
    }

    #[tokio::test]
    async fn resync_only_writes_from_today() {
        let (definition, course, semester) = fixture();
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let cutoff = time::start_of_day(today);
        let definition_id = definition.id;
        let mut store = store_with(course, semester);
        store
            .expect_replace_instances_from()
            .withf(move |_, id, from, records| {
                *id == definition_id
                    && *from == cutoff
                    && records.len() == 1
                    && records[0].date
                        == NaiveDateTime::parse_from_str("2025-01-14 14:00", "%Y-%m-%d %H:%M")
                            .unwrap()
            })
            .times(1)
            .returning(|_, _, _, records| {
                Ok(ReplaceOutcome {
                    removed: 1,
                    created: records.len() as u64,
                })
            });

        let outcome = resync(&store, &definition, today).await.unwrap();

        assert_eq!(outcome, ReplaceOutcome { removed: 1, created: 1 });
    }

    #[tokio::test]
    async fn resync_propagates_generation_failure() {
        let (definition, course, _) = fixture();
        let mut store = MockPlannerStore::new();
        store
            .expect_get_course()
            .returning(move |_, _| Ok(Some(course.clone())));
        store.expect_get_semester().returning(|_, _| Ok(None));

        let err = resync(&store, &definition, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, TrackError::GenerationFailure(_)));
    }
}
