//! Read-side projections over stored instances.
//!
//! Each view is rebuilt on every call: instances are fetched by date range,
//! joined with their definitions and courses, and shaped for rendering. The
//! missed flag is derived here from `today` and never stored.

use std::collections::{HashMap, HashSet};

use chrono::{Days, NaiveDate};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::{
    assignment::AssignmentFilter,
    course::Course,
    semester::MAX_SEMESTER_WEEKS,
    task_definition::TaskDefinition,
    task_instance::{InstanceFilter, TaskInstance},
    views::{
        AssignmentView, CourseGrid, CourseSummary, CourseWeek, DefinitionSummary, GridCell,
        GridRow, InstanceView, SemesterView,
    },
};
use crate::services::task_definitions::display_order;
use crate::store::PlannerStore;
use crate::time;

pub const DEFAULT_LOOKBACK_WEEKS: i64 = 4;
pub const DEFAULT_DAYS_AHEAD: i64 = 7;

/// `count * unit` days, or `None` unless `count` is positive and the product fits.
fn positive_days(count: i64, unit: u64) -> Option<u64> {
    u64::try_from(count)
        .ok()
        .filter(|c| *c > 0)
        .and_then(|c| c.checked_mul(unit))
}

fn unique<T: Copy + Eq + std::hash::Hash>(values: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

/// Joins instances with their definition and course, dropping any whose
/// parents can no longer be resolved.
async fn enrich(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    instances: Vec<TaskInstance>,
    today: NaiveDate,
) -> TrackResult<Vec<InstanceView>> {
    if instances.is_empty() {
        return Ok(Vec::new());
    }

    let definition_ids = unique(instances.iter().map(|i| i.task_definition_id));
    let definitions: HashMap<Uuid, TaskDefinition> = store
        .get_definitions(owner_id, &definition_ids)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();

    let course_ids = unique(definitions.values().map(|d| d.course_id));
    let courses: HashMap<Uuid, Course> = store
        .get_courses(owner_id, &course_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut views = Vec::with_capacity(instances.len());
    for instance in instances {
        let Some(definition) = definitions.get(&instance.task_definition_id) else {
            warn!(
                "Skipping instance {}: task definition {} not found",
                instance.id, instance.task_definition_id
            );
            continue;
        };
        let Some(course) = courses.get(&definition.course_id) else {
            warn!(
                "Skipping instance {}: course {} not found",
                instance.id, definition.course_id
            );
            continue;
        };
        views.push(InstanceView {
            id: instance.id,
            date: instance.date,
            description: instance.description,
            is_completed: instance.is_completed,
            is_missed: time::is_missed(instance.date, instance.is_completed, today),
            level_of_understanding: instance.level_of_understanding,
            task_definition: DefinitionSummary::from(definition),
            course: CourseSummary::from(course),
        });
    }
    Ok(views)
}

/// First day after a `days`-long window opening on `start`.
fn day_after_window(start: NaiveDate, days: u64) -> TrackResult<NaiveDate> {
    start.checked_add_days(Days::new(days)).ok_or_else(|| {
        TrackError::Validation(format!("Date {} is outside the supported range", start))
    })
}

/// All instances on `date`, earliest first.
pub async fn daily(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    date: NaiveDate,
    today: NaiveDate,
) -> TrackResult<Vec<InstanceView>> {
    let filter = InstanceFilter::between(
        time::start_of_day(date),
        time::start_of_day(day_after_window(date, 1)?),
    );
    let instances = store.list_instances(owner_id, &filter).await?;
    debug!("Daily view for {}: {} instances", date, instances.len());
    enrich(store, owner_id, instances, today).await
}

/// The seven days from `week_start`, grouped by course. Only courses with at
/// least one instance that week appear, alphabetically.
pub async fn weekly(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    week_start: NaiveDate,
    today: NaiveDate,
) -> TrackResult<Vec<CourseWeek>> {
    let filter = InstanceFilter::between(
        time::start_of_day(week_start),
        time::start_of_day(day_after_window(week_start, 7)?),
    );
    let instances = store.list_instances(owner_id, &filter).await?;
    let views = enrich(store, owner_id, instances, today).await?;

    let mut groups: Vec<CourseWeek> = Vec::new();
    for view in views {
        match groups.iter_mut().find(|g| g.course_id == view.course.id) {
            Some(group) => group.instances.push(view),
            None => groups.push(CourseWeek {
                course_id: view.course.id,
                course_name: view.course.name.clone(),
                course_color: view.course.color.clone(),
                instances: vec![view],
            }),
        }
    }

    groups.sort_by(|a, b| {
        a.course_name
            .cmp(&b.course_name)
            .then(a.course_id.cmp(&b.course_id))
    });
    for group in &mut groups {
        group.instances.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    }
    Ok(groups)
}

/// A definition-by-week grid for every course in the semester.
pub async fn semester(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    semester_id: Uuid,
    today: NaiveDate,
) -> TrackResult<SemesterView> {
    let semester = store
        .get_semester(owner_id, semester_id)
        .await?
        .ok_or_else(|| TrackError::not_found("Semester", semester_id))?;
    let weeks = usize::try_from(semester.number_of_weeks.min(MAX_SEMESTER_WEEKS)).unwrap_or(0);

    let courses = store.list_courses(owner_id, semester_id).await?;
    let course_ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();
    let definitions = if course_ids.is_empty() {
        Vec::new()
    } else {
        store.list_definitions(owner_id, &course_ids).await?
    };

    let definition_ids: Vec<Uuid> = definitions.iter().map(|d| d.id).collect();
    let instances = if definition_ids.is_empty() {
        Vec::new()
    } else {
        store
            .list_instances(owner_id, &InstanceFilter::for_definitions(definition_ids))
            .await?
    };

    let mut by_definition: HashMap<Uuid, Vec<TaskInstance>> = HashMap::new();
    for instance in instances {
        by_definition
            .entry(instance.task_definition_id)
            .or_default()
            .push(instance);
    }

    let mut grids = Vec::with_capacity(courses.len());
    for course in &courses {
        let mut course_definitions: Vec<&TaskDefinition> = definitions
            .iter()
            .filter(|d| d.course_id == course.id)
            .collect();
        course_definitions.sort_by(|a, b| display_order(a, b));

        let rows = course_definitions
            .into_iter()
            .map(|definition| {
                let mut cells = vec![Vec::new(); weeks];
                for instance in by_definition.get(&definition.id).into_iter().flatten() {
                    let index = semester.week_index(instance.date.date());
                    match usize::try_from(index).ok().filter(|i| *i < weeks) {
                        Some(i) => cells[i].push(GridCell {
                            instance_id: instance.id,
                            date: instance.date,
                            is_completed: instance.is_completed,
                            is_missed: time::is_missed(
                                instance.date,
                                instance.is_completed,
                                today,
                            ),
                        }),
                        None => debug!(
                            "Instance {} falls in week {} outside semester {}",
                            instance.id, index, semester.id
                        ),
                    }
                }
                GridRow {
                    task_definition: DefinitionSummary::from(definition),
                    weeks: cells,
                }
            })
            .collect();

        grids.push(CourseGrid {
            course_id: course.id,
            course_name: course.name.clone(),
            course_color: course.color.clone(),
            rows,
        });
    }

    Ok(SemesterView {
        semester_id: semester.id,
        semester_name: semester.name.clone(),
        start_date: semester.start_date,
        number_of_weeks: semester.number_of_weeks,
        current_week_index: semester.week_index(today),
        courses: grids,
    })
}

/// Incomplete instances from the last `lookback_weeks` weeks, oldest first.
/// Today is excluded.
pub async fn gaps(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    lookback_weeks: i64,
    today: NaiveDate,
) -> TrackResult<Vec<InstanceView>> {
    let window_start = positive_days(lookback_weeks, 7)
        .and_then(|days| today.checked_sub_days(Days::new(days)))
        .ok_or_else(|| {
            TrackError::Validation("lookbackWeeks must be a positive number of weeks".to_string())
        })?;
    let filter = InstanceFilter {
        is_completed: Some(false),
        ..InstanceFilter::between(time::start_of_day(window_start), time::start_of_day(today))
    };
    let instances = store.list_instances(owner_id, &filter).await?;
    enrich(store, owner_id, instances, today).await
}

/// Assignments due from the start of today through the end of
/// `today + days_ahead`, nearest first.
pub async fn upcoming(
    store: &dyn PlannerStore,
    owner_id: Uuid,
    days_ahead: i64,
    today: NaiveDate,
) -> TrackResult<Vec<AssignmentView>> {
    // the window closes at the end of the last day, i.e. the start of the next
    let window_end = positive_days(days_ahead, 1)
        .and_then(|days| today.checked_add_days(Days::new(days + 1)))
        .ok_or_else(|| {
            TrackError::Validation("daysAhead must be a positive number of days".to_string())
        })?;
    let filter = AssignmentFilter {
        course_ids: None,
        due_from: Some(time::start_of_day(today)),
        due_until: Some(time::start_of_day(window_end)),
    };
    let assignments = store.list_assignments(owner_id, &filter).await?;

    let course_ids = unique(assignments.iter().map(|a| a.course_id));
    let courses: HashMap<Uuid, Course> = store
        .get_courses(owner_id, &course_ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(assignments
        .into_iter()
        .filter_map(|assignment| match courses.get(&assignment.course_id) {
            Some(course) => Some(AssignmentView {
                course: CourseSummary::from(course),
                assignment,
            }),
            None => {
                warn!(
                    "Skipping assignment {}: course {} not found",
                    assignment.id, assignment.course_id
                );
                None
            }
        })
        .collect())
}
