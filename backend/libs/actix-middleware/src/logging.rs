//! Request span and logging middleware
//!
//! Opens one server span per request, parented on the inbound W3C trace context, and
//! logs request start and completion inside it. Handlers run inside the span, so
//! `tracing::Span::current()` there is the request span and every log line carries
//! the correlation ID recorded on it.
//!
//! Register it *inside* [`CorrelationIdMiddleware`](crate::CorrelationIdMiddleware)
//! (i.e. `.wrap(RequestLogging).wrap(CorrelationIdMiddleware)`) so the ID is already
//! in the request extensions.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::HeaderMap,
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use opentelemetry_config::extract_context;
use std::future::{ready, Ready};
use std::time::Instant;
use tracing::{field, Instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::correlation_id::CorrelationId;

/// Middleware that traces and logs HTTP requests and responses
#[derive(Clone, Default)]
pub struct RequestLogging;

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingService { service }))
    }
}

pub struct RequestLoggingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();

        let span = tracing::info_span!(
            "http_request",
            otel.kind = "server",
            otel.name = %format!("{} {}", method, path),
            http.method = %method,
            http.target = %path,
            http.status_code = field::Empty,
            correlation_id = field::Empty,
        );

        if let Some(correlation_id) = req.extensions().get::<CorrelationId>() {
            span.record("correlation_id", correlation_id.as_str());
        }

        span.set_parent(extract_context(&HeaderExtractor(req.headers())));

        let fut = span.in_scope(|| {
            tracing::info!(method = %method, path = %path, "HTTP request started");
            self.service.call(req)
        });

        let request_span = span.clone();
        Box::pin(
            async move {
                let res = fut.await?;
                let status = res.status();
                request_span.record("http.status_code", status.as_u16());

                tracing::info!(
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "HTTP request completed"
                );

                Ok(res)
            }
            .instrument(span),
        )
    }
}

/// actix header extractor for trace context propagation
struct HeaderExtractor<'a>(&'a HeaderMap);

impl opentelemetry::propagation::Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}
