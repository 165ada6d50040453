use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use coursetrack_core::{
    errors::TrackError,
    models::user::{
        normalize_email, LoginRequest, LoginResponse, NewUser, SignupRequest, SignupResponse,
    },
};
use std::sync::Arc;
use tracing::info;

use crate::{
    extract::AppJson,
    middleware::{
        auth::{self, SessionToken},
        error_handling::AppError,
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn signup(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    payload.validate()?;

    // Hash the password before it goes anywhere near the store
    let new_user = NewUser {
        email: normalize_email(&payload.email),
        password_hash: auth::hash_password(&payload.password)?,
        name: payload
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
    };

    let user = state.store.create_user(&new_user).await?.ok_or_else(|| {
        TrackError::Validation(format!("Email {} is already registered", new_user.email))
    })?;
    info!("Registered user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user_id: user.id,
            email: user.email,
        }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let invalid = || TrackError::Authentication("Invalid email or password".to_string());

    // Look up the account and check the password
    let credentials = state
        .store
        .get_user_by_email(&normalize_email(&payload.email))
        .await?
        .ok_or_else(invalid)?;
    if !auth::verify_password(&payload.password, &credentials.password_hash)? {
        return Err(invalid().into());
    }

    // Open a session
    let token = auth::generate_session_token();
    let expires_at = Utc::now() + state.session_ttl;
    state
        .store
        .create_session(&token, credentials.user.id, expires_at)
        .await?;
    info!("Opened session for user {}", credentials.user.id);

    Ok(Json(LoginResponse {
        user_id: credentials.user.id,
        email: credentials.user.email,
        token,
        expires_at,
    }))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> Result<StatusCode, AppError> {
    state.store.delete_session(&token).await?;
    Ok(StatusCode::NO_CONTENT)
}
