/// Todo business logic
///
/// Creation is a two-step operation: acquire an identifier from the id service, then
/// store the record. A failed acquisition leaves storage untouched.
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::context::RequestContext;
use crate::error::{AppError, Result};
use crate::models::{CreateTodoRequest, Todo, UpdateTodoRequest};
use crate::repository::TodoRepository;
use crate::services::IdGenerator;

pub struct TodoService {
    repository: Arc<dyn TodoRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl TodoService {
    pub fn new(repository: Arc<dyn TodoRepository>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { repository, ids }
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>> {
        Ok(self.repository.get_all().await?)
    }

    pub async fn get_todo(&self, id: i64) -> Result<Todo> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(AppError::todo_not_found)
    }

    pub async fn create_todo(&self, ctx: &RequestContext, req: CreateTodoRequest) -> Result<Todo> {
        req.validate()?;

        let uuid = self.ids.acquire_id(ctx).await.map_err(|e| {
            warn!(error = %e, "Todo not created, identifier unavailable");
            AppError::from(e)
        })?;

        let todo = self
            .repository
            .create(Todo::new(req.title, req.description))
            .await?;

        info!(todo_id = todo.id, uuid = %uuid, "Todo created");
        Ok(todo)
    }

    pub async fn update_todo(&self, id: i64, req: UpdateTodoRequest) -> Result<Todo> {
        req.validate()?;

        let updated = self.repository.update(id, req.into()).await?;

        info!(todo_id = id, "Todo updated");
        Ok(updated)
    }

    pub async fn delete_todo(&self, id: i64) -> Result<()> {
        self.repository.delete(id).await?;
        info!(todo_id = id, "Todo deleted");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        Ok(self.repository.health_check().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryTodoRepository;
    use crate::services::{IdServiceError, MockIdGenerator};
    use actix_middleware::CorrelationId;
    use reqwest::StatusCode;

    fn ctx() -> RequestContext {
        RequestContext::new(CorrelationId::new("svc-test"), tracing::Span::none())
    }

    fn create_request(title: &str) -> CreateTodoRequest {
        CreateTodoRequest {
            title: title.to_string(),
            description: "desc".to_string(),
        }
    }

    fn service_with(ids: MockIdGenerator) -> (TodoService, Arc<InMemoryTodoRepository>) {
        let repository = Arc::new(InMemoryTodoRepository::new());
        (TodoService::new(repository.clone(), Arc::new(ids)), repository)
    }

    #[tokio::test]
    async fn test_create_acquires_identifier_with_request_correlation_id() {
        let mut ids = MockIdGenerator::new();
        ids.expect_acquire_id()
            .withf(|ctx| ctx.correlation_id().as_str() == "svc-test")
            .times(1)
            .returning(|_| Ok("0b3c-uuid".to_string()));
        let (service, repository) = service_with(ids);

        let todo = service.create_todo(&ctx(), create_request("Buy milk")).await.unwrap();

        assert_eq!(todo, Todo::with_id(1, "Buy milk", "desc"));
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_acquisition_stores_nothing() {
        let mut ids = MockIdGenerator::new();
        ids.expect_acquire_id()
            .times(1)
            .returning(|_| Err(IdServiceError::Status(StatusCode::SERVICE_UNAVAILABLE)));
        let (service, repository) = service_with(ids);

        let err = service
            .create_todo(&ctx(), create_request("Buy milk"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UpstreamUnavailable(_)));
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_create_skips_identifier_call() {
        let mut ids = MockIdGenerator::new();
        ids.expect_acquire_id().times(0);
        let (service, _) = service_with(ids);

        let err = service.create_todo(&ctx(), create_request("")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_missing_todo() {
        let (service, _) = service_with(MockIdGenerator::new());
        let err = service.get_todo(5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Todo not found"));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let (service, repository) = service_with(MockIdGenerator::new());
        repository
            .create(Todo::with_id(4, "Old", "Keep me"))
            .await
            .unwrap();

        let updated = service
            .update_todo(
                4,
                UpdateTodoRequest {
                    title: Some("New".into()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated, Todo::with_id(4, "New", "Keep me"));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (service, repository) = service_with(MockIdGenerator::new());
        repository.create(Todo::new("a", "")).await.unwrap();

        service.delete_todo(1).await.unwrap();

        assert!(matches!(service.get_todo(1).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete_todo(1).await, Err(AppError::NotFound(_))));
    }

    /// Holds every update until two are in flight
    struct GatedRepository {
        inner: InMemoryTodoRepository,
        gate: tokio::sync::Barrier,
    }

    #[async_trait::async_trait]
    impl TodoRepository for GatedRepository {
        async fn create(&self, todo: Todo) -> crate::repository::RepositoryResult<Todo> {
            self.inner.create(todo).await
        }

        async fn get_by_id(&self, id: i64) -> crate::repository::RepositoryResult<Option<Todo>> {
            self.inner.get_by_id(id).await
        }

        async fn get_all(&self) -> crate::repository::RepositoryResult<Vec<Todo>> {
            self.inner.get_all().await
        }

        async fn update(
            &self,
            id: i64,
            patch: crate::models::TodoPatch,
        ) -> crate::repository::RepositoryResult<Todo> {
            self.gate.wait().await;
            self.inner.update(id, patch).await
        }

        async fn delete(&self, id: i64) -> crate::repository::RepositoryResult<()> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_partial_updates_do_not_overwrite_each_other() {
        let repository = Arc::new(GatedRepository {
            inner: InMemoryTodoRepository::new(),
            gate: tokio::sync::Barrier::new(2),
        });
        repository
            .create(Todo::with_id(1, "old title", "old desc"))
            .await
            .unwrap();
        let service = Arc::new(TodoService::new(repository, Arc::new(MockIdGenerator::new())));

        let title_update = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .update_todo(
                        1,
                        UpdateTodoRequest {
                            title: Some("new title".into()),
                            description: None,
                        },
                    )
                    .await
            })
        };
        let description_update = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .update_todo(
                        1,
                        UpdateTodoRequest {
                            title: None,
                            description: Some("new desc".into()),
                        },
                    )
                    .await
            })
        };

        title_update.await.unwrap().unwrap();
        description_update.await.unwrap().unwrap();

        assert_eq!(
            service.get_todo(1).await.unwrap(),
            Todo::with_id(1, "new title", "new desc")
        );
    }
}
