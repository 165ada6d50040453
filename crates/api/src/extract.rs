//! Request extractors whose rejections use the API's error body.

use axum::extract::{FromRequest, FromRequestParts};

use crate::middleware::error_handling::AppError;

/// `axum::Json` that rejects malformed bodies as a validation error.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `axum::extract::Query` that rejects malformed parameters as a validation error.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);
