//! Tracing configuration structures

use serde::{Deserialize, Serialize};

/// Default OTLP gRPC collector endpoint (SigNoz, Jaeger and Tempo all listen here).
pub const DEFAULT_OTLP_ENDPOINT: &str = "http://localhost:4317";

/// Type of trace exporter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExporterType {
    /// OpenTelemetry Protocol over gRPC
    #[default]
    Otlp,
}

/// Configuration for distributed tracing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Export spans to a collector. When false only structured logs are emitted.
    pub enabled: bool,

    /// Type of exporter to use
    pub exporter: ExporterType,

    /// OTLP collector endpoint
    /// Example: "http://signoz-otel-collector:4317"
    pub otlp_endpoint: Option<String>,

    /// Ratio of root traces to sample (0.0 to 1.0).
    /// Child spans always follow the sampling decision of their remote parent.
    pub sample_rate: f64,

    /// Service version reported as `service.version`
    pub service_version: String,

    /// Deployment environment (development, staging, production)
    pub environment: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            exporter: ExporterType::Otlp,
            otlp_endpoint: Some(DEFAULT_OTLP_ENDPOINT.to_string()),
            sample_rate: 1.0,
            service_version: "dev".to_string(),
            environment: "development".to_string(),
        }
    }
}

impl TracingConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `TRACING_ENABLED`: Enable span export (true/false)
    /// - `OTLP_ENDPOINT`: OTLP collector endpoint (default: http://localhost:4317)
    /// - `APP_SIGNOZ_HOST_PORT`: collector `host:port`, used when `OTLP_ENDPOINT` is unset
    /// - `TRACING_SAMPLE_RATE`: Sample rate (0.0-1.0, default 1.0)
    /// - `SERVICE_VERSION`: Service version
    /// - `APP_ENV`: Environment (development/staging/production)
    pub fn from_env() -> Self {
        let enabled = std::env::var("TRACING_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        let otlp_endpoint = non_blank_env("OTLP_ENDPOINT")
            .or_else(|| non_blank_env("APP_SIGNOZ_HOST_PORT").map(with_http_scheme))
            .or_else(|| Some(DEFAULT_OTLP_ENDPOINT.to_string()));

        let sample_rate = std::env::var("TRACING_SAMPLE_RATE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(1.0)
            .clamp(0.0, 1.0);

        let service_version =
            std::env::var("SERVICE_VERSION").unwrap_or_else(|_| "dev".to_string());

        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Self {
            enabled,
            exporter: ExporterType::Otlp,
            otlp_endpoint,
            sample_rate,
            service_version,
            environment,
        }
    }

    /// Create development configuration (trace all requests to a local collector)
    pub fn development() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Endpoint the exporter connects to
    pub fn endpoint(&self) -> &str {
        self.otlp_endpoint.as_deref().unwrap_or(DEFAULT_OTLP_ENDPOINT)
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn with_http_scheme(host_port: String) -> String {
    if host_port.contains("://") {
        host_port
    } else {
        format!("http://{}", host_port)
    }
}
