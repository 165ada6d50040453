use crate::models::DbNote;
use coursetrack_core::models::note::Note;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn insert_note(pool: &Pool<Postgres>, note: &Note) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO notes (id, title, description, task_instance_id, owner_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(note.id)
    .bind(&note.title)
    .bind(&note.description)
    .bind(note.task_instance_id)
    .bind(note.owner_id)
    .bind(note.created_at)
    .bind(note.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_note(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<Option<DbNote>> {
    let note = sqlx::query_as::<_, DbNote>(
        r#"
        SELECT id, title, description, task_instance_id, owner_id, created_at, updated_at
        FROM notes
        WHERE id = $1 AND owner_id = $2
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(note)
}

pub async fn list_notes(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    task_instance_id: Uuid,
) -> Result<Vec<DbNote>> {
    let notes = sqlx::query_as::<_, DbNote>(
        r#"
        SELECT id, title, description, task_instance_id, owner_id, created_at, updated_at
        FROM notes
        WHERE owner_id = $1 AND task_instance_id = $2
        ORDER BY created_at, id
        "#,
    )
    .bind(owner_id)
    .bind(task_instance_id)
    .fetch_all(pool)
    .await?;

    Ok(notes)
}

pub async fn update_note(pool: &Pool<Postgres>, note: &Note) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE notes
        SET title = $1, description = $2, updated_at = $3
        WHERE id = $4 AND owner_id = $5
        "#,
    )
    .bind(&note.title)
    .bind(&note.description)
    .bind(note.updated_at)
    .bind(note.id)
    .bind(note.owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_note(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
