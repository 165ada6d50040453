use crate::models::DbUser;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Returns `None` when the email is already taken.
pub async fn create_user(
    pool: &Pool<Postgres>,
    email: &str,
    password_hash: &str,
    name: Option<&str>,
) -> Result<Option<DbUser>> {
    tracing::debug!("Creating user: email={}", email);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, email, password_hash, name, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO NOTHING
        RETURNING id, email, password_hash, name, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, email, password_hash, name, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn create_session(
    pool: &Pool<Postgres>,
    token: &str,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token, user_id, expires_at, created_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_session_owner(
    pool: &Pool<Postgres>,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<Uuid>> {
    let owner = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT user_id
        FROM sessions
        WHERE token = $1 AND expires_at > $2
        "#,
    )
    .bind(token)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(owner)
}

pub async fn delete_session(pool: &Pool<Postgres>, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
