use crate::models::DbCourse;
use coursetrack_core::models::course::Course;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn insert_course(pool: &Pool<Postgres>, course: &Course) -> Result<()> {
    tracing::debug!("Inserting course: id={}, semester={}", course.id, course.semester_id);

    sqlx::query(
        r#"
        INSERT INTO courses (id, name, color, instructor, description, semester_id, owner_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(course.id)
    .bind(&course.name)
    .bind(&course.color)
    .bind(&course.instructor)
    .bind(&course.description)
    .bind(course.semester_id)
    .bind(course.owner_id)
    .bind(course.created_at)
    .bind(course.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_course(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<Option<DbCourse>> {
    let course = sqlx::query_as::<_, DbCourse>(
        r#"
        SELECT id, name, color, instructor, description, semester_id, owner_id, created_at, updated_at
        FROM courses
        WHERE id = $1 AND owner_id = $2
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(course)
}

pub async fn list_courses(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    semester_id: Uuid,
) -> Result<Vec<DbCourse>> {
    let courses = sqlx::query_as::<_, DbCourse>(
        r#"
        SELECT id, name, color, instructor, description, semester_id, owner_id, created_at, updated_at
        FROM courses
        WHERE owner_id = $1 AND semester_id = $2
        ORDER BY name, id
        "#,
    )
    .bind(owner_id)
    .bind(semester_id)
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

pub async fn get_courses(pool: &Pool<Postgres>, owner_id: Uuid, ids: &[Uuid]) -> Result<Vec<DbCourse>> {
    let courses = sqlx::query_as::<_, DbCourse>(
        r#"
        SELECT id, name, color, instructor, description, semester_id, owner_id, created_at, updated_at
        FROM courses
        WHERE owner_id = $1 AND id = ANY($2)
        "#,
    )
    .bind(owner_id)
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

pub async fn update_course(pool: &Pool<Postgres>, course: &Course) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET name = $1, color = $2, instructor = $3, description = $4, updated_at = $5
        WHERE id = $6 AND owner_id = $7
        "#,
    )
    .bind(&course.name)
    .bind(&course.color)
    .bind(&course.instructor)
    .bind(&course.description)
    .bind(course.updated_at)
    .bind(course.id)
    .bind(course.owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_course(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
