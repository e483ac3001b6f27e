use actix_middleware::{CorrelationIdMiddleware, RequestLogging};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use db_pool::{create_pool, DbConfig};
use opentelemetry_config::{Telemetry, TracingConfig};
use std::sync::Arc;
use tracing::info;

use todo_service::repository::{InMemoryTodoRepository, PostgresTodoRepository, TodoRepository};
use todo_service::services::{IdGenerator, IdServiceClient, TodoService};
use todo_service::{configure_routes, Config, SERVICE_NAME};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let telemetry = Telemetry::init(SERVICE_NAME, &TracingConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        listen = %config.listen_host_port,
        id_service = %config.id_service_url(),
        id_timeout_ms = config.id_timeout_ms,
        id_max_retries = config.id_max_retries,
        exporting_traces = telemetry.is_exporting(),
        "Starting todo-service"
    );

    let repository: Arc<dyn TodoRepository> = match config.database_url() {
        Some(url) => {
            let db_config = DbConfig::from_env(SERVICE_NAME, url);
            db_config.log_config();
            let pool = create_pool(db_config)
                .await
                .context("Failed to connect to database")?;

            let repository = PostgresTodoRepository::new(pool);
            repository
                .migrate()
                .await
                .context("Failed to run database migrations")?;
            info!("Using PostgreSQL storage");
            Arc::new(repository)
        }
        None => {
            info!("APP_DATABASE_URL not set, using in-memory storage");
            Arc::new(InMemoryTodoRepository::new())
        }
    };

    let ids: Arc<dyn IdGenerator> = Arc::new(
        IdServiceClient::new(config.id_client_config())
            .context("Failed to build id service client")?,
    );

    let service = web::Data::new(TodoService::new(repository, ids));

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(RequestLogging)
            .wrap(CorrelationIdMiddleware)
            .configure(configure_routes)
    })
    .bind(&config.listen_host_port)
    .with_context(|| format!("Failed to bind {}", config.listen_host_port))?
    .run()
    .await
    .context("HTTP server error")?;

    info!("todo-service stopped");
    telemetry.shutdown();
    Ok(())
}
