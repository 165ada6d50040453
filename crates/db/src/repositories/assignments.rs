use crate::models::DbAssignment;
use coursetrack_core::models::assignment::{Assignment, AssignmentFilter};
use eyre::Result;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

const COLUMNS: &str = "id, title, description, due_date, is_completed, course_id, owner_id, \
                       created_at, updated_at";

pub async fn insert_assignment(pool: &Pool<Postgres>, assignment: &Assignment) -> Result<()> {
    sqlx::query(&format!(
        "INSERT INTO assignments ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        COLUMNS
    ))
    .bind(assignment.id)
    .bind(&assignment.title)
    .bind(&assignment.description)
    .bind(assignment.due_date)
    .bind(assignment.is_completed)
    .bind(assignment.course_id)
    .bind(assignment.owner_id)
    .bind(assignment.created_at)
    .bind(assignment.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_assignment(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
) -> Result<Option<DbAssignment>> {
    let assignment = sqlx::query_as::<_, DbAssignment>(&format!(
        "SELECT {} FROM assignments WHERE id = $1 AND owner_id = $2",
        COLUMNS
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(assignment)
}

pub async fn list_assignments(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    filter: &AssignmentFilter,
) -> Result<Vec<DbAssignment>> {
    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM assignments WHERE owner_id = ",
        COLUMNS
    ));
    query_builder.push_bind(owner_id);

    if let Some(ids) = &filter.course_ids {
        query_builder
            .push(" AND course_id = ANY(")
            .push_bind(ids.clone())
            .push(")");
    }
    if let Some(from) = filter.due_from {
        query_builder.push(" AND due_date >= ").push_bind(from);
    }
    if let Some(until) = filter.due_until {
        query_builder.push(" AND due_date < ").push_bind(until);
    }
    query_builder.push(" ORDER BY due_date, id");

    let assignments = query_builder
        .build_query_as::<DbAssignment>()
        .fetch_all(pool)
        .await?;

    Ok(assignments)
}

pub async fn update_assignment(pool: &Pool<Postgres>, assignment: &Assignment) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE assignments
        SET title = $1, description = $2, due_date = $3, is_completed = $4, updated_at = $5
        WHERE id = $6 AND owner_id = $7
        "#,
    )
    .bind(&assignment.title)
    .bind(&assignment.description)
    .bind(assignment.due_date)
    .bind(assignment.is_completed)
    .bind(assignment.updated_at)
    .bind(assignment.id)
    .bind(assignment.owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_assignment(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_assignments_for_courses(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    course_ids: &[Uuid],
) -> Result<u64> {
    let result = sqlx::query("DELETE FROM assignments WHERE owner_id = $1 AND course_id = ANY($2)")
        .bind(owner_id)
        .bind(course_ids)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
