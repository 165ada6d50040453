use crate::models::DbTaskInstance;
use chrono::{NaiveDateTime, Utc};
use coursetrack_core::models::task_instance::{InstanceFilter, NewTaskInstance, TaskInstance};
use eyre::Result;
use sqlx::{Pool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

const COLUMNS: &str = "id, date, is_completed, description, level_of_understanding, \
                       task_definition_id, owner_id, created_at, updated_at";

/// Rows per INSERT; keeps the bind count under PostgreSQL's parameter limit.
const INSERT_CHUNK: usize = 1000;

async fn insert_chunked(
    tx: &mut Transaction<'_, Postgres>,
    records: &[NewTaskInstance],
) -> Result<u64> {
    let now = Utc::now();
    let mut inserted = 0;

    for chunk in records.chunks(INSERT_CHUNK) {
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO task_instances ({}) ",
            COLUMNS
        ));
        query_builder.push_values(chunk, |mut b, record| {
            b.push_bind(Uuid::new_v4())
                .push_bind(record.date)
                .push_bind(record.is_completed)
                .push_bind(record.description.clone())
                .push_bind(record.level_of_understanding.map(i16::from))
                .push_bind(record.task_definition_id)
                .push_bind(record.owner_id)
                .push_bind(now)
                .push_bind(now);
        });
        query_builder.push(" ON CONFLICT (task_definition_id, date) DO NOTHING");

        let result = query_builder.build().execute(&mut **tx).await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

async fn delete_with_notes(
    tx: &mut Transaction<'_, Postgres>,
    owner_id: Uuid,
    instance_ids: &[Uuid],
) -> Result<u64> {
    sqlx::query("DELETE FROM notes WHERE owner_id = $1 AND task_instance_id = ANY($2)")
        .bind(owner_id)
        .bind(instance_ids)
        .execute(&mut **tx)
        .await?;

    let result = sqlx::query("DELETE FROM task_instances WHERE owner_id = $1 AND id = ANY($2)")
        .bind(owner_id)
        .bind(instance_ids)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected())
}

/// Single insert; `None` when the `(definition, date)` slot is taken.
pub async fn insert_instance(
    pool: &Pool<Postgres>,
    record: &NewTaskInstance,
) -> Result<Option<DbTaskInstance>> {
    let now = Utc::now();
    let instance = sqlx::query_as::<_, DbTaskInstance>(&format!(
        "INSERT INTO task_instances ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (task_definition_id, date) DO NOTHING RETURNING {}",
        COLUMNS, COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(record.date)
    .bind(record.is_completed)
    .bind(&record.description)
    .bind(record.level_of_understanding.map(i16::from))
    .bind(record.task_definition_id)
    .bind(record.owner_id)
    .bind(now)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(instance)
}

pub async fn insert_instances(pool: &Pool<Postgres>, records: &[NewTaskInstance]) -> Result<u64> {
    if records.is_empty() {
        return Ok(0);
    }
    let mut tx = pool.begin().await?;
    let inserted = insert_chunked(&mut tx, records).await?;
    tx.commit().await?;

    tracing::debug!("Inserted {} of {} task instances", inserted, records.len());
    Ok(inserted)
}

/// Deletes the definition's instances dated at or after `from` (with their
/// notes) and inserts `records`, all in one transaction.
pub async fn replace_instances_from(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    task_definition_id: Uuid,
    from: NaiveDateTime,
    records: &[NewTaskInstance],
) -> Result<(u64, u64)> {
    let mut tx = pool.begin().await?;

    let stale: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM task_instances
        WHERE owner_id = $1 AND task_definition_id = $2 AND date >= $3
        FOR UPDATE
        "#,
    )
    .bind(owner_id)
    .bind(task_definition_id)
    .bind(from)
    .fetch_all(&mut *tx)
    .await?;

    let removed = if stale.is_empty() {
        0
    } else {
        delete_with_notes(&mut tx, owner_id, &stale).await?
    };
    let created = insert_chunked(&mut tx, records).await?;

    tx.commit().await?;

    tracing::debug!(
        "Replaced instances of definition {} from {}: removed={}, created={}",
        task_definition_id,
        from,
        removed,
        created
    );
    Ok((removed, created))
}

pub async fn get_instance(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
) -> Result<Option<DbTaskInstance>> {
    let instance = sqlx::query_as::<_, DbTaskInstance>(&format!(
        "SELECT {} FROM task_instances WHERE id = $1 AND owner_id = $2",
        COLUMNS
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    Ok(instance)
}

pub async fn list_instances(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    filter: &InstanceFilter,
) -> Result<Vec<DbTaskInstance>> {
    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM task_instances WHERE owner_id = ",
        COLUMNS
    ));
    query_builder.push_bind(owner_id);

    if let Some(ids) = &filter.task_definition_ids {
        query_builder
            .push(" AND task_definition_id = ANY(")
            .push_bind(ids.clone())
            .push(")");
    }
    if let Some(from) = filter.from {
        query_builder.push(" AND date >= ").push_bind(from);
    }
    if let Some(until) = filter.until {
        query_builder.push(" AND date < ").push_bind(until);
    }
    if let Some(is_completed) = filter.is_completed {
        query_builder.push(" AND is_completed = ").push_bind(is_completed);
    }
    query_builder.push(" ORDER BY date, id");

    let instances = query_builder
        .build_query_as::<DbTaskInstance>()
        .fetch_all(pool)
        .await?;

    Ok(instances)
}

pub async fn update_instance(pool: &Pool<Postgres>, instance: &TaskInstance) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE task_instances
        SET is_completed = $1, description = $2, level_of_understanding = $3, updated_at = $4
        WHERE id = $5 AND owner_id = $6
        "#,
    )
    .bind(instance.is_completed)
    .bind(&instance.description)
    .bind(instance.level_of_understanding.map(i16::from))
    .bind(instance.updated_at)
    .bind(instance.id)
    .bind(instance.owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_instance(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool> {
    let mut tx = pool.begin().await?;
    let removed = delete_with_notes(&mut tx, owner_id, &[id]).await?;
    tx.commit().await?;

    Ok(removed > 0)
}

pub async fn delete_instances_for_definitions(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    task_definition_ids: &[Uuid],
) -> Result<u64> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM notes
        WHERE owner_id = $1 AND task_instance_id IN (
            SELECT id FROM task_instances WHERE owner_id = $1 AND task_definition_id = ANY($2)
        )
        "#,
    )
    .bind(owner_id)
    .bind(task_definition_ids)
    .execute(&mut *tx)
    .await?;

    let result = sqlx::query(
        "DELETE FROM task_instances WHERE owner_id = $1 AND task_definition_id = ANY($2)",
    )
    .bind(owner_id)
    .bind(task_definition_ids)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(result.rows_affected())
}
