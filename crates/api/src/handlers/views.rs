//! Read-only calendar views. Every view derives "missed" from the server's
//! notion of today, so the same request can change answer at midnight.

use axum::{extract::State, Extension, Json};
use chrono::NaiveDate;
use coursetrack_core::{
    errors::{TrackError, TrackResult},
    models::views::{AssignmentView, CourseWeek, InstanceView, SemesterView},
    projector, time,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    extract::AppQuery,
    middleware::{auth::Owner, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Default, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyQuery {
    pub week_start_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterQuery {
    pub semester_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapsQuery {
    pub lookback_weeks: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingQuery {
    pub days_ahead: Option<i64>,
}

fn day_or(name: &str, value: Option<&str>, default: NaiveDate) -> TrackResult<NaiveDate> {
    match value {
        None => Ok(default),
        Some(v) => time::parse_date(v).ok_or_else(|| {
            TrackError::Validation(format!("{} must be a YYYY-MM-DD date, got '{}'", name, v))
        }),
    }
}

/// `GET /api/views/daily?date=YYYY-MM-DD`, defaulting to today.
#[axum::debug_handler]
pub async fn daily(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<DailyQuery>,
) -> Result<Json<Vec<InstanceView>>, AppError> {
    let today = state.today();
    let date = day_or("date", query.date.as_deref(), today)?;
    let views = projector::daily(state.store.as_ref(), owner_id, date, today).await?;
    Ok(Json(views))
}

/// `GET /api/views/weekly?weekStartDate=YYYY-MM-DD`, defaulting to the
/// Sunday that opens the current week.
#[axum::debug_handler]
pub async fn weekly(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<WeeklyQuery>,
) -> Result<Json<Vec<CourseWeek>>, AppError> {
    let today = state.today();
    let week_start = day_or(
        "weekStartDate",
        query.week_start_date.as_deref(),
        time::start_of_week(today),
    )?;
    let groups = projector::weekly(state.store.as_ref(), owner_id, week_start, today).await?;
    Ok(Json(groups))
}

#[axum::debug_handler]
pub async fn semester(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<SemesterQuery>,
) -> Result<Json<SemesterView>, AppError> {
    let today = state.today();
    let view = projector::semester(state.store.as_ref(), owner_id, query.semester_id, today).await?;
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn gaps(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<GapsQuery>,
) -> Result<Json<Vec<InstanceView>>, AppError> {
    let lookback = query
        .lookback_weeks
        .unwrap_or(projector::DEFAULT_LOOKBACK_WEEKS);
    let views = projector::gaps(state.store.as_ref(), owner_id, lookback, state.today()).await?;
    Ok(Json(views))
}

#[axum::debug_handler]
pub async fn upcoming(
    State(state): State<Arc<ApiState>>,
    Extension(Owner(owner_id)): Extension<Owner>,
    AppQuery(query): AppQuery<UpcomingQuery>,
) -> Result<Json<Vec<AssignmentView>>, AppError> {
    let days_ahead = query.days_ahead.unwrap_or(projector::DEFAULT_DAYS_AHEAD);
    let views =
        projector::upcoming(state.store.as_ref(), owner_id, days_ahead, state.today()).await?;
    Ok(Json(views))
}
