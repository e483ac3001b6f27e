//! OpenTelemetry Configuration Library
//!
//! Owns the telemetry lifecycle for the todo and id services: structured JSON logging
//! through `tracing-subscriber`, optional span export over OTLP, and W3C trace-context
//! propagation helpers.
//!
//! No tracer provider is registered globally. [`Telemetry::init`] returns a guard that
//! `main` keeps alive for the lifetime of the process; dropping it flushes pending spans
//! and shuts the exporter down.

use opentelemetry::trace::{TraceError, TracerProvider as _};
use opentelemetry::KeyValue;
use opentelemetry_otlp::{Compression, WithExportConfig};
use opentelemetry_sdk::{
    runtime,
    trace::{self, RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod config;
pub mod propagation;

pub use config::{ExporterType, TracingConfig, DEFAULT_OTLP_ENDPOINT};
pub use propagation::{extract_context, inject_context, HeaderInjector};

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP span exporter: {0}")]
    Exporter(#[from] TraceError),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Process-wide telemetry handle
///
/// # Example
/// ```no_run
/// use opentelemetry_config::{Telemetry, TracingConfig};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let telemetry = Telemetry::init("todo-service", &TracingConfig::from_env())
///         .expect("Failed to initialize telemetry");
///
///     // ... run the service ...
///
///     telemetry.shutdown();
/// }
/// ```
pub struct Telemetry {
    service_name: String,
    provider: Option<TracerProvider>,
}

impl Telemetry {
    /// Install the global `tracing` subscriber and, when enabled, the OTLP pipeline.
    ///
    /// Must be called from within a Tokio runtime when span export is enabled.
    pub fn init(service_name: &str, config: &TracingConfig) -> Result<Self, TelemetryError> {
        let provider = if config.enabled {
            Some(build_provider(service_name, config)?)
        } else {
            None
        };

        let telemetry_layer = provider.as_ref().map(|provider| {
            tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_string()))
        });

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true),
            )
            .with(telemetry_layer)
            .try_init()?;

        if config.enabled {
            tracing::info!(
                service = service_name,
                endpoint = config.endpoint(),
                sample_rate = config.sample_rate,
                "OpenTelemetry tracing initialized"
            );
        } else {
            tracing::info!(service = service_name, "Span export disabled, logging only");
        }

        Ok(Self {
            service_name: service_name.to_string(),
            provider,
        })
    }

    /// Whether spans are exported to a collector
    pub fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }

    /// Flush pending spans and release the exporter.
    pub fn shutdown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(provider) = self.provider.take() else {
            return;
        };

        for result in provider.force_flush() {
            if let Err(e) = result {
                tracing::warn!(service = %self.service_name, error = %e, "Failed to flush spans");
            }
        }

        // Dropping the last provider handle shuts down its span processors.
        drop(provider);
        tracing::info!(service = %self.service_name, "Telemetry shut down");
    }
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        self.release();
    }
}

/// Build an OTLP tracer provider
fn build_provider(service_name: &str, config: &TracingConfig) -> Result<TracerProvider, TraceError> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(config.endpoint())
        .with_compression(Compression::Gzip)
        .build_span_exporter()?;

    let resource = Resource::new(vec![
        KeyValue::new("service.name", service_name.to_string()),
        KeyValue::new("service.version", config.service_version.clone()),
        KeyValue::new("deployment.environment", config.environment.clone()),
    ]);

    // actix runs current-thread runtimes, so the batch processor gets its own thread.
    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::TokioCurrentThread)
        .with_config(
            trace::config()
                .with_sampler(Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
                    config.sample_rate,
                ))))
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(resource),
        )
        .build();

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_config_creation() {
        let config = TracingConfig {
            enabled: true,
            exporter: ExporterType::Otlp,
            otlp_endpoint: Some("http://localhost:4317".to_string()),
            sample_rate: 0.5,
            service_version: "1.0.0".to_string(),
            environment: "test".to_string(),
        };

        assert!(config.enabled);
        assert_eq!(config.endpoint(), "http://localhost:4317");
    }

    #[tokio::test]
    async fn test_build_provider_is_lazy() {
        // The tonic channel connects lazily, so no collector is needed here.
        let config = TracingConfig::development();
        let provider = build_provider("test-service", &config);
        assert!(provider.is_ok());
    }
}
