use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
use coursetrack_api::middleware::error_handling::{AppError, ACCESS_DENIED_MESSAGE};
use coursetrack_core::errors::TrackError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;

async fn body_of(err: TrackError) -> (StatusCode, Value) {
    let response = AppError(err).into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[rstest]
#[case(TrackError::NotFound("Course".into()), StatusCode::NOT_FOUND)]
#[case(TrackError::AccessDenied("Course".into()), StatusCode::NOT_FOUND)]
#[case(TrackError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case(TrackError::Authentication("no".into()), StatusCode::UNAUTHORIZED)]
#[case(TrackError::GenerationFailure("walk".into()), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(TrackError::Database(eyre::eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_per_kind(#[case] err: TrackError, #[case] expected: StatusCode) {
    assert_eq!(AppError(err).status(), expected);
}

#[test_log::test(tokio::test)]
async fn access_denied_hides_details() {
    let (status, body) = body_of(TrackError::parent_unavailable(
        "Course",
        "3f1c0f5e-5c8e-4a43-9a3c-0d9f3b7b9c11",
    ))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], ACCESS_DENIED_MESSAGE);
}

#[test_log::test(tokio::test)]
async fn validation_message_is_passed_through() {
    let (status, body) = body_of(TrackError::Validation(
        "Schedule must contain at least one entry".into(),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Validation error: Schedule must contain at least one entry"
    );
}

#[tokio::test]
async fn eyre_reports_become_server_errors() {
    let err: AppError = eyre::eyre!("pool timed out").into();

    assert!(matches!(err.0, TrackError::Database(_)));
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
}
