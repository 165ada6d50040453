use axum::http::{header, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{fake_email, register, test_server};

#[tokio::test]
async fn signup_normalizes_email() {
    let server = test_server();

    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "email": "  Ada@Example.COM ", "password": "correct horse" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["email"], "ada@example.com");
    assert!(body["userId"].is_string());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let server = test_server();
    let email = fake_email();
    let signup = json!({ "email": email, "password": "correct horse" });

    server
        .post("/api/auth/signup")
        .json(&signup)
        .await
        .assert_status(StatusCode::CREATED);
    let response = server
        .post("/api/auth/signup")
        .json(&json!({ "email": email.to_uppercase(), "password": "another horse" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("already registered"));
}

#[tokio::test]
async fn short_password_is_rejected() {
    let server = test_server();

    server
        .post("/api/auth/signup")
        .json(&json!({ "email": fake_email(), "password": "short" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let server = test_server();
    let session = register(&server).await;

    let wrong_password = server
        .post("/api/auth/login")
        .json(&json!({ "email": session.email, "password": "not the password" }))
        .await;
    let unknown_email = server
        .post("/api/auth/login")
        .json(&json!({ "email": fake_email(), "password": "not the password" }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_email.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = wrong_password.json();
    assert_eq!(
        body["error"],
        "Authentication error: Invalid email or password"
    );
}

#[tokio::test]
async fn login_issues_long_token() {
    let server = test_server();
    let session = register(&server).await;

    assert_eq!(session.token.len(), 48);
    session.list("/api/semesters").await;
}

#[tokio::test]
async fn protected_routes_need_a_session() {
    let server = test_server();

    server
        .get("/api/semesters")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/api/views/daily")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not-a-session"),
        )
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let server = test_server();
    let session = register(&server).await;

    session
        .post("/api/auth/logout", &json!({}))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    session
        .get("/api/semesters")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let server = test_server();

    let health = server.get("/health").await;
    health.assert_status_ok();
    health.assert_json(&json!({ "status": "ok" }));

    let version: Value = server.get("/version").await.json();
    assert_eq!(version["name"], "coursetrack-api");
}
