use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{TrackError, TrackResult};
use crate::models::required_text;
use crate::time;

/// Longest semester that can be scheduled, two years of weeks.
pub const MAX_SEMESTER_WEEKS: i32 = 104;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub number_of_weeks: i32,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Semester {
    /// Final day covered by the semester, inclusive. `None` when the
    /// semester has no weeks or runs past the last representable date.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let span = u64::try_from(self.total_days() - 1).ok()?;
        self.start_date.checked_add_days(Days::new(span))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.last_day().is_some_and(|last| date <= last)
    }

    pub fn week_index(&self, date: NaiveDate) -> i64 {
        time::week_index(date, self.start_date)
    }

    pub fn total_days(&self) -> i64 {
        i64::from(self.number_of_weeks) * 7
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSemesterRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub number_of_weeks: i32,
}

impl CreateSemesterRequest {
    pub fn into_semester(self, owner_id: Uuid) -> TrackResult<Semester> {
        let name = required_text("Semester name", &self.name)?;
        validate_weeks(self.number_of_weeks)?;
        let now = Utc::now();
        Ok(Semester {
            id: Uuid::new_v4(),
            name,
            start_date: self.start_date,
            number_of_weeks: self.number_of_weeks,
            owner_id,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSemesterRequest {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub number_of_weeks: Option<i32>,
}

impl UpdateSemesterRequest {
    /// True when the request would move or resize the semester's timeframe.
    pub fn changes_timeframe(&self, current: &Semester) -> bool {
        self.start_date.is_some_and(|d| d != current.start_date)
            || self
                .number_of_weeks
                .is_some_and(|w| w != current.number_of_weeks)
    }

    pub fn apply(self, semester: &mut Semester) -> TrackResult<()> {
        if let Some(name) = &self.name {
            semester.name = required_text("Semester name", name)?;
        }
        if let Some(weeks) = self.number_of_weeks {
            validate_weeks(weeks)?;
            semester.number_of_weeks = weeks;
        }
        if let Some(start_date) = self.start_date {
            semester.start_date = start_date;
        }
        semester.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_weeks(weeks: i32) -> TrackResult<()> {
    if weeks < 1 {
        return Err(TrackError::Validation(
            "Semester must be at least 1 week long".to_string(),
        ));
    }
    if weeks > MAX_SEMESTER_WEEKS {
        return Err(TrackError::Validation(format!(
            "Semester cannot be longer than {} weeks",
            MAX_SEMESTER_WEEKS
        )));
    }
    Ok(())
}
