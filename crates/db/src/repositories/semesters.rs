use crate::models::DbSemester;
use coursetrack_core::models::semester::Semester;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn insert_semester(pool: &Pool<Postgres>, semester: &Semester) -> Result<()> {
    tracing::debug!("Inserting semester: id={}, owner={}", semester.id, semester.owner_id);

    sqlx::query(
        r#"
        INSERT INTO semesters (id, name, start_date, number_of_weeks, owner_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(semester.id)
    .bind(&semester.name)
    .bind(semester.start_date)
    .bind(semester.number_of_weeks)
    .bind(semester.owner_id)
    .bind(semester.created_at)
    .bind(semester.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_semester(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
) -> Result<Option<DbSemester>> {
    let semester = sqlx::query_as::<_, DbSemester>(
        r#"
        SELECT id, name, start_date, number_of_weeks, owner_id, created_at, updated_at
        FROM semesters
        WHERE id = $1 AND owner_id = $2
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(semester)
}

pub async fn list_semesters(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<DbSemester>> {
    let semesters = sqlx::query_as::<_, DbSemester>(
        r#"
        SELECT id, name, start_date, number_of_weeks, owner_id, created_at, updated_at
        FROM semesters
        WHERE owner_id = $1
        ORDER BY start_date DESC, id
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(semesters)
}

pub async fn update_semester(pool: &Pool<Postgres>, semester: &Semester) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE semesters
        SET name = $1, start_date = $2, number_of_weeks = $3, updated_at = $4
        WHERE id = $5 AND owner_id = $6
        "#,
    )
    .bind(&semester.name)
    .bind(semester.start_date)
    .bind(semester.number_of_weeks)
    .bind(semester.updated_at)
    .bind(semester.id)
    .bind(semester.owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_semester(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM semesters WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
