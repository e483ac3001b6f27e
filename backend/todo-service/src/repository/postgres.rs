use async_trait::async_trait;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::{debug, info};

use super::{RepositoryError, RepositoryResult, TodoRepository};
use crate::models::{Todo, TodoPatch};

/// Schema migrations for the `todos` table
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL-backed todo storage
#[derive(Clone)]
pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bring the schema up to date
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        MIGRATOR.run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Remove every record and restart ids at 1
    pub async fn clear(&self) -> RepositoryResult<()> {
        sqlx::query("TRUNCATE TABLE todos RESTART IDENTITY")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Move the id sequence past explicitly inserted ids
    async fn sync_id_sequence(&self) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            SELECT setval(
                pg_get_serial_sequence('todos', 'id'),
                GREATEST((SELECT COALESCE(MAX(id), 0) FROM todos), 1),
                (SELECT COUNT(*) > 0 FROM todos)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn create(&self, todo: Todo) -> RepositoryResult<Todo> {
        if todo.id < 0 {
            return Err(RepositoryError::InvalidId(todo.id));
        }

        if todo.id == 0 {
            let created = sqlx::query_as::<_, Todo>(
                r#"
                INSERT INTO todos (title, description)
                VALUES ($1, $2)
                RETURNING id, title, description
                "#,
            )
            .bind(&todo.title)
            .bind(&todo.description)
            .fetch_one(&self.pool)
            .await?;

            debug!(todo_id = created.id, "Inserted todo");
            return Ok(created);
        }

        let created = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (id, title, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO NOTHING
            RETURNING id, title, description
            "#,
        )
        .bind(todo.id)
        .bind(&todo.title)
        .bind(&todo.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::Duplicate(todo.id))?;

        self.sync_id_sequence().await?;
        debug!(todo_id = created.id, "Inserted todo with explicit id");
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, title, description FROM todos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Todo>> {
        let todos =
            sqlx::query_as::<_, Todo>("SELECT id, title, description FROM todos ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(todos)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> RepositoryResult<Todo> {
        sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET title = COALESCE($2, title),
                description = COALESCE($3, description)
            WHERE id = $1
            RETURNING id, title, description
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
