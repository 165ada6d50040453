use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced parent entity is missing or belongs to another owner.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Generation failure: {0}")]
    GenerationFailure(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TrackError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        TrackError::NotFound(format!("{} with ID {} not found", entity, id))
    }

    pub fn parent_unavailable(entity: &str, id: impl std::fmt::Display) -> Self {
        TrackError::AccessDenied(format!("{} {} not found or access denied", entity, id))
    }
}

pub type TrackResult<T> = Result<T, TrackError>;
