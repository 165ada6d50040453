//! # Authentication Module
//!
//! Password hashing for accounts and bearer-session resolution for requests.
//! A successful login stores a random token with an expiry; every protected
//! route runs [`require_auth`], which turns that token back into the owner id
//! all core operations are scoped by.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use coursetrack_core::errors::TrackError;
use eyre::{eyre, Result};
use rand::{distributions::Alphanumeric, Rng};
use tracing::debug;
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

pub const SESSION_TOKEN_LENGTH: usize = 48;

/// The authenticated owner, inserted into request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub Uuid);

/// The bearer token the request was authenticated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

/// Hashes a password using the Argon2 algorithm
///
/// Returns the PHC string (algorithm, parameters, salt and hash), generated
/// with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC hash. A malformed hash is an error,
/// a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|e| eyre!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolves `Authorization: Bearer <token>` to an [`Owner`]. Missing, unknown
/// and expired tokens are all rejected with 401.
pub async fn require_auth(
    State(state): State<Arc<ApiState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| TrackError::Authentication("Missing bearer token".to_string()))?
        .to_string();

    let owner_id = state
        .store
        .get_session_owner(&token, Utc::now())
        .await?
        .ok_or_else(|| TrackError::Authentication("Invalid or expired session".to_string()))?;
    debug!("Authenticated request for owner {}", owner_id);

    request.extensions_mut().insert(Owner(owner_id));
    request.extensions_mut().insert(SessionToken(token));
    Ok(next.run(request).await)
}
