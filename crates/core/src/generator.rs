//! Materializes a task definition's weekly schedule into dated instances.
//!
//! Generation is pure: it reads the definition, its course and the course's
//! semester and returns the instances that should exist, without touching the
//! store. Callers decide how the result is persisted.

use chrono::{Days, NaiveTime};
use tracing::{debug, warn};

use crate::errors::{TrackError, TrackResult};
use crate::models::{
    course::Course,
    semester::{MAX_SEMESTER_WEEKS, Semester},
    task_definition::TaskDefinition,
    task_instance::NewTaskInstance,
};
use crate::time;

/// Produces one pending instance per schedule entry per matching day of the
/// semester, covering `start_date` through `start_date + 7 * weeks - 1`.
///
/// A schedule entry whose start time cannot be parsed is placed at midnight
/// and logged instead of aborting the whole run.
pub fn generate(
    definition: &TaskDefinition,
    course: &Course,
    semester: &Semester,
) -> TrackResult<Vec<NewTaskInstance>> {
    if definition.course_id != course.id {
        return Err(TrackError::GenerationFailure(format!(
            "Course {} does not own task definition {}",
            course.id, definition.id
        )));
    }
    if course.semester_id != semester.id {
        return Err(TrackError::GenerationFailure(format!(
            "Semester {} does not own course {}",
            semester.id, course.id
        )));
    }
    if semester.number_of_weeks < 1 {
        return Err(TrackError::GenerationFailure(format!(
            "Semester {} has no weeks to schedule",
            semester.id
        )));
    }

    let slots: Vec<(u8, NaiveTime)> = definition
        .schedule
        .iter()
        .map(|entry| {
            let start = entry.parsed_start_time().unwrap_or_else(|| {
                warn!(
                    "Definition {} has unparseable start time '{}', using midnight",
                    definition.id, entry.start_time
                );
                NaiveTime::MIN
            });
            (entry.day_of_week, start)
        })
        .collect();

    let out_of_range = || {
        TrackError::GenerationFailure(format!(
            "Semester {} runs past the schedulable date range",
            semester.id
        ))
    };
    if semester.number_of_weeks > MAX_SEMESTER_WEEKS {
        return Err(out_of_range());
    }

    let mut instances = Vec::new();
    for offset in 0..semester.total_days() as u64 {
        let day = semester
            .start_date
            .checked_add_days(Days::new(offset))
            .ok_or_else(out_of_range)?;
        let weekday = time::day_of_week(day);
        for (slot_day, start) in &slots {
            if *slot_day == weekday {
                instances.push(NewTaskInstance::pending(
                    definition.id,
                    definition.owner_id,
                    day.and_time(*start),
                ));
            }
        }
    }

    debug!(
        "Generated {} instances for definition {} over {} weeks",
        instances.len(),
        definition.id,
        semester.number_of_weeks
    );
    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        course::CreateCourseRequest,
        semester::CreateSemesterRequest,
        task_definition::{CreateTaskDefinitionRequest, ScheduleEntry, TaskType},
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use uuid::Uuid;

    fn fixture(
        start: NaiveDate,
        weeks: i32,
        schedule: Vec<ScheduleEntry>,
    ) -> (TaskDefinition, Course, Semester) {
        let owner = Uuid::new_v4();
        let semester = CreateSemesterRequest {
            name: "Fall".into(),
            start_date: start,
            number_of_weeks: weeks,
        }
        .into_semester(owner)
        .unwrap();
        let course = CreateCourseRequest {
            name: "Algorithms".into(),
            color: None,
            instructor: None,
            description: None,
            semester_id: semester.id,
        }
        .into_course(owner)
        .unwrap();
        let mut definition = CreateTaskDefinitionRequest {
            task_type: TaskType::Lecture,
            instructor: None,
            description: None,
            schedule: vec![ScheduleEntry::new(1, "10:00")],
            length_minutes: Some(90),
            course_id: course.id,
        }
        .into_definition(owner)
        .unwrap();
        // bypass validation so malformed entries can be exercised
        definition.schedule = schedule;
        (definition, course, semester)
    }

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").unwrap()
    }

    fn fall_2024() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    #[test]
    fn monday_wednesday_lecture_over_fourteen_weeks() {
        let (definition, course, semester) = fixture(
            fall_2024(),
            14,
            vec![ScheduleEntry::new(1, "10:00"), ScheduleEntry::new(3, "10:00")],
        );

        let instances = generate(&definition, &course, &semester).unwrap();
        let dates: Vec<NaiveDateTime> = instances.iter().map(|i| i.date).collect();

        assert_eq!(dates.len(), 28);
        assert_eq!(dates[0], at("2024-09-02T10:00"));
        assert_eq!(dates[1], at("2024-09-04T10:00"));
        // week 13 opens on 2024-12-02; the semester's last day is 2024-12-08
        assert_eq!(dates[26], at("2024-12-02T10:00"));
        assert_eq!(dates[27], at("2024-12-04T10:00"));
        assert!(instances.iter().all(|i| !i.is_completed
            && i.task_definition_id == definition.id
            && i.owner_id == definition.owner_id));
    }

    #[rstest]
    #[case(1, 1)]
    #[case(3, 7)]
    #[case(7, 16)]
    fn count_is_entries_times_weeks(#[case] entries: u8, #[case] weeks: i32) {
        let schedule = (0..entries)
            .map(|day| ScheduleEntry::new(day, "08:30"))
            .collect();
        let (definition, course, semester) = fixture(fall_2024(), weeks, schedule);

        let instances = generate(&definition, &course, &semester).unwrap();

        assert_eq!(instances.len(), entries as usize * weeks as usize);
    }

    #[test]
    fn instances_stay_inside_semester() {
        let (definition, course, semester) = fixture(
            fall_2024(),
            2,
            vec![ScheduleEntry::new(0, "23:59"), ScheduleEntry::new(1, "00:00")],
        );

        let instances = generate(&definition, &course, &semester).unwrap();

        assert!(!instances.is_empty());
        for instance in &instances {
            assert!(semester.contains(instance.date.date()));
        }
    }

    #[test]
    fn duplicate_entries_yield_duplicate_dates() {
        let (definition, course, semester) = fixture(
            fall_2024(),
            1,
            vec![ScheduleEntry::new(1, "10:00"), ScheduleEntry::new(1, "10:00")],
        );

        let instances = generate(&definition, &course, &semester).unwrap();

        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].date, instances[1].date);
    }

    #[test]
    fn malformed_start_time_falls_back_to_midnight() {
        let (definition, course, semester) =
            fixture(fall_2024(), 1, vec![ScheduleEntry::new(1, "soon")]);

        let instances = generate(&definition, &course, &semester).unwrap();

        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].date, at("2024-09-02T00:00"));
    }

    #[test]
    fn oversized_semester_is_a_generation_failure() {
        let (definition, course, mut semester) =
            fixture(fall_2024(), 1, vec![ScheduleEntry::new(1, "10:00")]);
        semester.number_of_weeks = 20_000_000;

        let err = generate(&definition, &course, &semester).unwrap_err();

        assert!(matches!(err, TrackError::GenerationFailure(_)));
    }

    #[test]
    fn date_overflow_is_a_generation_failure() {
        let (definition, course, mut semester) =
            fixture(fall_2024(), 2, vec![ScheduleEntry::new(1, "10:00")]);
        semester.start_date = NaiveDate::MAX;

        let err = generate(&definition, &course, &semester).unwrap_err();

        assert!(matches!(err, TrackError::GenerationFailure(_)));
        assert_eq!(semester.last_day(), None);
    }

    #[test]
    fn rejects_definition_from_another_course() {
        let (mut definition, course, semester) =
            fixture(fall_2024(), 1, vec![ScheduleEntry::new(1, "10:00")]);
        definition.course_id = Uuid::new_v4();

        let err = generate(&definition, &course, &semester).unwrap_err();

        assert!(matches!(err, TrackError::GenerationFailure(_)));
    }

    #[test]
    fn rejects_course_from_another_semester() {
        let (definition, mut course, semester) =
            fixture(fall_2024(), 1, vec![ScheduleEntry::new(1, "10:00")]);
        course.semester_id = Uuid::new_v4();

        assert!(matches!(
            generate(&definition, &course, &semester),
            Err(TrackError::GenerationFailure(_))
        ));
    }
}
