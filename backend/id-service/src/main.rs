use actix_middleware::{CorrelationIdMiddleware, RequestLogging};
use actix_web::{App, HttpServer};
use anyhow::Context;
use opentelemetry_config::{Telemetry, TracingConfig};
use tracing::info;

use id_service::{configure_routes, Config, SERVICE_NAME};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let telemetry = Telemetry::init(SERVICE_NAME, &TracingConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(listen = %config.listen_host_port, "Starting id-service");

    HttpServer::new(|| {
        App::new()
            .wrap(RequestLogging)
            .wrap(CorrelationIdMiddleware)
            .configure(configure_routes)
    })
    .bind(&config.listen_host_port)
    .with_context(|| format!("Failed to bind {}", config.listen_host_port))?
    .run()
    .await
    .context("HTTP server error")?;

    info!("id-service stopped");
    telemetry.shutdown();
    Ok(())
}
