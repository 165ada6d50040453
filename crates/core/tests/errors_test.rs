use std::error::Error;
use coursetrack_core::errors::{TrackError, TrackResult};
use uuid::Uuid;

#[test]
fn test_track_error_display() {
    let not_found = TrackError::NotFound("Semester not found".to_string());
    let validation = TrackError::Validation("Schedule cannot be empty".to_string());
    let access = TrackError::AccessDenied("Course x not found or access denied".to_string());
    let authentication = TrackError::Authentication("Invalid credentials".to_string());
    let generation = TrackError::GenerationFailure("Semester missing".to_string());
    let database = TrackError::Database(eyre::eyre!("Database connection failed"));
    let internal = TrackError::Internal(Box::new(std::io::Error::other("Internal error")));

    assert_eq!(not_found.to_string(), "Resource not found: Semester not found");
    assert_eq!(
        validation.to_string(),
        "Validation error: Schedule cannot be empty"
    );
    assert_eq!(
        access.to_string(),
        "Access denied: Course x not found or access denied"
    );
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Invalid credentials"
    );
    assert_eq!(generation.to_string(), "Generation failure: Semester missing");
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_helper_messages() {
    let id = Uuid::nil();

    let not_found = TrackError::not_found("Course", id);
    assert!(matches!(not_found, TrackError::NotFound(_)));
    assert_eq!(
        not_found.to_string(),
        format!("Resource not found: Course with ID {} not found", id)
    );

    let parent = TrackError::parent_unavailable("Semester", id);
    assert!(matches!(parent, TrackError::AccessDenied(_)));
    assert!(parent.to_string().contains("not found or access denied"));
}

#[test]
fn test_error_source() {
    let io_error = std::io::Error::other("IO error");
    let track_error = TrackError::Internal(Box::new(io_error));

    assert!(track_error.source().is_some());
}

#[test]
fn test_track_result() {
    let result: TrackResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: TrackResult<i32> = Err(TrackError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre() {
    let track_error: TrackError = eyre::eyre!("pool timed out").into();

    assert!(matches!(track_error, TrackError::Database(_)));
    assert!(track_error.to_string().contains("pool timed out"));
}
