//! Per-request context handed from handlers to services

use actix_middleware::{get_correlation_id, CorrelationId};
use actix_web::{dev::Payload, Error, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// Correlation ID and trace span of the request being served.
///
/// Outbound calls made on behalf of the request take both from here.
#[derive(Debug, Clone)]
pub struct RequestContext {
    correlation_id: CorrelationId,
    span: tracing::Span,
}

impl RequestContext {
    pub fn new(correlation_id: CorrelationId, span: tracing::Span) -> Self {
        Self {
            correlation_id,
            span,
        }
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::new(
            get_correlation_id(req),
            tracing::Span::current(),
        )))
    }
}
