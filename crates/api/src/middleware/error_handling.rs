//! # Error Handling Middleware
//!
//! Maps [`TrackError`] to HTTP status codes and a `{"error": "..."}` body.
//! An inaccessible parent is reported exactly like a missing resource, so a
//! caller cannot discover another owner's data.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coursetrack_core::errors::TrackError;
use serde_json::json;
use tracing::error;

pub const ACCESS_DENIED_MESSAGE: &str = "Resource not found or access denied";

/// Application error wrapper that provides HTTP status code mapping
#[derive(Debug)]
pub struct AppError(pub TrackError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TrackError::NotFound(_) | TrackError::AccessDenied(_) => StatusCode::NOT_FOUND,
            TrackError::Validation(_) => StatusCode::BAD_REQUEST,
            TrackError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TrackError::GenerationFailure(_)
            | TrackError::Database(_)
            | TrackError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match &self.0 {
            TrackError::AccessDenied(_) => ACCESS_DENIED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({ "error": self.message() }));
        (status, body).into_response()
    }
}

impl From<TrackError> for AppError {
    fn from(err: TrackError) -> Self {
        AppError(err)
    }
}

/// Wraps an adapter failure as a database error.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(TrackError::Database(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(TrackError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(TrackError::Validation(rejection.body_text()))
    }
}
