//! Client for the identifier service
//!
//! Every todo creation first fetches a UUID from `GET {id-service}/id`. The request
//! carries the caller's correlation ID and the W3C trace context of a `get-id`
//! client span opened under the caller's request span.

use actix_middleware::CORRELATION_ID;
use async_trait::async_trait;
use opentelemetry_config::{inject_context, HeaderInjector};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use resilience::{with_retry_if, with_timeout, RetryConfig};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, field, warn, Instrument};

use crate::context::RequestContext;

/// Path of the identifier endpoint on the id service
pub const ID_PATH: &str = "/id";

/// Reply body of the identifier endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdReply {
    #[serde(rename = "id")]
    pub uuid: String,
}

#[derive(Debug, Error)]
pub enum IdServiceError {
    #[error("id service unreachable: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("id service did not answer within {0:?}")]
    Timeout(Duration),

    #[error("id service answered with status {0}")]
    Status(StatusCode),

    #[error("id service reply could not be decoded: {0}")]
    Decode(String),
}

impl IdServiceError {
    /// Transport failures, timeouts and 5xx replies may succeed on another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            IdServiceError::Transport(_) | IdServiceError::Timeout(_) => true,
            IdServiceError::Status(status) => status.is_server_error(),
            IdServiceError::Decode(_) => false,
        }
    }
}

/// Source of identifiers for new todos
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdGenerator: Send + Sync {
    /// Fetch a fresh identifier on behalf of the request described by `ctx`
    async fn acquire_id(&self, ctx: &RequestContext) -> Result<String, IdServiceError>;
}

#[derive(Debug, Clone)]
pub struct IdClientConfig {
    /// Scheme, host and port of the id service
    pub base_url: String,
    /// Deadline for a single attempt, response body included
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl IdClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
            retry: RetryConfig::none(),
        }
    }
}

/// HTTP implementation of [`IdGenerator`]
pub struct IdServiceClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    retry: RetryConfig,
}

impl IdServiceClient {
    pub fn new(config: IdClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}{}", config.base_url.trim_end_matches('/'), ID_PATH),
            timeout: config.timeout,
            retry: config.retry,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn outbound_headers(ctx: &RequestContext, span: &tracing::Span) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(ctx.correlation_id().as_str()) {
            headers.insert(HeaderName::from_static(CORRELATION_ID), value);
        }
        inject_context(span, &mut HeaderInjector(&mut headers));
        headers
    }

    async fn request_once(&self, ctx: &RequestContext) -> Result<String, IdServiceError> {
        let span = tracing::info_span!(
            parent: ctx.span(),
            "get-id",
            otel.kind = "client",
            http.method = "GET",
            http.url = %self.endpoint,
            http.status_code = field::Empty,
            correlation_id = %ctx.correlation_id(),
        );
        let headers = Self::outbound_headers(ctx, &span);
        let request = self.http.get(&self.endpoint).headers(headers);

        async move {
            let response = with_timeout(self.timeout, request.send())
                .await
                .map_err(|_| IdServiceError::Timeout(self.timeout))?
                .map_err(IdServiceError::Transport)?;

            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());
            if !status.is_success() {
                return Err(IdServiceError::Status(status));
            }

            let body = with_timeout(self.timeout, response.bytes())
                .await
                .map_err(|_| IdServiceError::Timeout(self.timeout))?
                .map_err(IdServiceError::Transport)?;

            let reply: IdReply = serde_json::from_slice(&body)
                .map_err(|e| IdServiceError::Decode(e.to_string()))?;
            if reply.uuid.trim().is_empty() {
                return Err(IdServiceError::Decode("empty id".to_string()));
            }

            debug!(uuid = %reply.uuid, "Received identifier");
            Ok(reply.uuid)
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl IdGenerator for IdServiceClient {
    async fn acquire_id(&self, ctx: &RequestContext) -> Result<String, IdServiceError> {
        with_retry_if(&self.retry, IdServiceError::is_retryable, || {
            self.request_once(ctx)
        })
        .await
        .map_err(|e| {
            let err = e.into_inner();
            warn!(
                correlation_id = %ctx.correlation_id(),
                endpoint = %self.endpoint,
                error = %err,
                "Failed to acquire identifier"
            );
            err
        })
    }
}
