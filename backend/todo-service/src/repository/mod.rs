//! Todo storage
//!
//! [`TodoRepository`] is the storage seam of the service. Two backends exist:
//! an in-process map for development and tests, and PostgreSQL.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Todo, TodoPatch};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTodoRepository;
pub use postgres::PostgresTodoRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("todo {0} not found")]
    NotFound(i64),

    #[error("todo {0} already exists")]
    Duplicate(i64),

    #[error("invalid todo id {0}")]
    InvalidId(i64),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Backend(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for todo records
///
/// Implementations must be safe for concurrent use: each operation is applied
/// atomically with respect to the others.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Store a record. An id of 0 gets the next unused id; a positive id is kept
    /// unless already taken.
    async fn create(&self, todo: Todo) -> RepositoryResult<Todo>;

    async fn get_by_id(&self, id: i64) -> RepositoryResult<Option<Todo>>;

    /// All records in ascending id order
    async fn get_all(&self) -> RepositoryResult<Vec<Todo>>;

    /// Apply `patch` to an existing record in one atomic step and return the result
    async fn update(&self, id: i64, patch: TodoPatch) -> RepositoryResult<Todo>;

    async fn delete(&self, id: i64) -> RepositoryResult<()>;

    /// Verify the backend is reachable
    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
