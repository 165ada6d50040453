use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_task_instances_slot ON task_instances(task_definition_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_task_instances_owner_date ON task_instances(owner_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_semesters_owner_id ON semesters(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_courses_semester_id ON courses(semester_id)",
    "CREATE INDEX IF NOT EXISTS idx_task_definitions_course_id ON task_definitions(course_id)",
    "CREATE INDEX IF NOT EXISTS idx_assignments_owner_due ON assignments(owner_id, due_date)",
    "CREATE INDEX IF NOT EXISTS idx_assignments_course_id ON assignments(course_id)",
    "CREATE INDEX IF NOT EXISTS idx_notes_task_instance_id ON notes(task_instance_id)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            name VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(64) PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create semesters table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS semesters (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            start_date DATE NOT NULL,
            number_of_weeks INTEGER NOT NULL,
            owner_id UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT weeks_in_range CHECK (number_of_weeks BETWEEN 1 AND 104)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create courses table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id UUID PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            color VARCHAR(32) NOT NULL DEFAULT '#cccccc',
            instructor VARCHAR(255) NULL,
            description TEXT NULL,
            semester_id UUID NOT NULL REFERENCES semesters(id),
            owner_id UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create task_definitions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS task_definitions (
            id UUID PRIMARY KEY,
            task_type VARCHAR(32) NOT NULL,
            instructor VARCHAR(255) NULL,
            description TEXT NULL,
            schedule JSONB NOT NULL,
            length_minutes INTEGER NULL,
            course_id UUID NOT NULL REFERENCES courses(id),
            owner_id UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT non_negative_length CHECK (length_minutes IS NULL OR length_minutes >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create task_instances table; dates are naive local time
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS task_instances (
            id UUID PRIMARY KEY,
            date TIMESTAMP WITHOUT TIME ZONE NOT NULL,
            is_completed BOOLEAN NOT NULL DEFAULT FALSE,
            description TEXT NULL,
            level_of_understanding SMALLINT NULL,
            task_definition_id UUID NOT NULL REFERENCES task_definitions(id),
            owner_id UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT understanding_range CHECK (
                level_of_understanding IS NULL OR level_of_understanding BETWEEN 0 AND 10
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create assignments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS assignments (
            id UUID PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            description TEXT NULL,
            due_date TIMESTAMP WITHOUT TIME ZONE NOT NULL,
            is_completed BOOLEAN NOT NULL DEFAULT FALSE,
            course_id UUID NOT NULL REFERENCES courses(id),
            owner_id UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create notes table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id UUID PRIMARY KEY,
            title VARCHAR(255) NULL,
            description TEXT NOT NULL,
            task_instance_id UUID NOT NULL REFERENCES task_instances(id),
            owner_id UUID NOT NULL REFERENCES users(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes; the unique slot index backs duplicate-tolerant inserts
    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
