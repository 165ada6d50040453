pub mod assignment;
pub mod course;
pub mod note;
pub mod semester;
pub mod task_definition;
pub mod task_instance;
pub mod user;
pub mod views;

use crate::errors::{TrackError, TrackResult};

/// Rejects blank required text fields and returns the trimmed value.
pub(crate) fn required_text(field: &str, value: &str) -> TrackResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TrackError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trims optional text, collapsing blank values to `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
