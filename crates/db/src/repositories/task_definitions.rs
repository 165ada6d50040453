use crate::models::DbTaskDefinition;
use coursetrack_core::models::task_definition::TaskDefinition;
use eyre::Result;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const COLUMNS: &str = "id, task_type, instructor, description, schedule, length_minutes, \
                       course_id, owner_id, created_at, updated_at";

pub async fn insert_definition(pool: &Pool<Postgres>, definition: &TaskDefinition) -> Result<()> {
    tracing::debug!(
        "Inserting task definition: id={}, course={}, entries={}",
        definition.id,
        definition.course_id,
        definition.schedule.len()
    );

    sqlx::query(
        r#"
        INSERT INTO task_definitions
            (id, task_type, instructor, description, schedule, length_minutes, course_id, owner_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(definition.id)
    .bind(definition.task_type.as_str())
    .bind(&definition.instructor)
    .bind(&definition.description)
    .bind(Json(&definition.schedule))
    .bind(definition.length_minutes)
    .bind(definition.course_id)
    .bind(definition.owner_id)
    .bind(definition.created_at)
    .bind(definition.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_definition(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
) -> Result<Option<DbTaskDefinition>> {
    let definition = sqlx::query_as::<_, DbTaskDefinition>(&format!(
        "SELECT {} FROM task_definitions WHERE id = $1 AND owner_id = $2",
        COLUMNS
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(definition)
}

pub async fn list_definitions(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    course_ids: &[Uuid],
) -> Result<Vec<DbTaskDefinition>> {
    let definitions = sqlx::query_as::<_, DbTaskDefinition>(&format!(
        "SELECT {} FROM task_definitions WHERE owner_id = $1 AND course_id = ANY($2) \
         ORDER BY created_at, id",
        COLUMNS
    ))
    .bind(owner_id)
    .bind(course_ids)
    .fetch_all(pool)
    .await?;

    Ok(definitions)
}

pub async fn get_definitions(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    ids: &[Uuid],
) -> Result<Vec<DbTaskDefinition>> {
    let definitions = sqlx::query_as::<_, DbTaskDefinition>(&format!(
        "SELECT {} FROM task_definitions WHERE owner_id = $1 AND id = ANY($2)",
        COLUMNS
    ))
    .bind(owner_id)
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(definitions)
}

pub async fn update_definition(pool: &Pool<Postgres>, definition: &TaskDefinition) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE task_definitions
        SET task_type = $1, instructor = $2, description = $3, schedule = $4,
            length_minutes = $5, updated_at = $6
        WHERE id = $7 AND owner_id = $8
        "#,
    )
    .bind(definition.task_type.as_str())
    .bind(&definition.instructor)
    .bind(&definition.description)
    .bind(Json(&definition.schedule))
    .bind(definition.length_minutes)
    .bind(definition.updated_at)
    .bind(definition.id)
    .bind(definition.owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_definition(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM task_definitions WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
