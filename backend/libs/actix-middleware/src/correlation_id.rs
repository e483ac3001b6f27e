//! Request correlation ID middleware
//!
//! Extracts or generates a correlation ID for every inbound request so that all work
//! triggered by it, including calls to other services, can be joined in logs and traces.
//!
//! ## Design
//! - If the request has a `CorrelationId` (or `X-Correlation-ID`) header: use it
//! - Otherwise: generate a UUID v4
//! - If the random source is unavailable: fall back to [`FALLBACK_CORRELATION_ID`]
//! - Store a typed [`CorrelationId`] in request extensions for handlers
//! - Echo the ID back on the response
//!
//! ## Example
//! ```rust
//! use actix_middleware::{CorrelationId, CorrelationIdMiddleware};
//! use actix_web::{web, App};
//!
//! async fn handler(correlation_id: CorrelationId) -> String {
//!     format!("correlation id: {}", correlation_id)
//! }
//!
//! let app = App::new()
//!     .wrap(CorrelationIdMiddleware)
//!     .route("/", web::get().to(handler));
//! ```

use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderMap, HeaderName, HeaderValue},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::fmt;
use std::future::{ready, Ready};

/// Name of the header carrying the correlation ID, inbound and outbound
pub const CORRELATION_ID: &str = "correlationid";

pub static CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static(CORRELATION_ID);

/// Alternative inbound header accepted from gateways and load balancers
pub static X_CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// Used when no random bytes can be obtained for a fresh ID
pub const FALLBACK_CORRELATION_ID: &str = "00000000-0000-0000-0000-000000000000";

const MAX_CORRELATION_ID_LEN: usize = 128;

/// Correlation ID of the request currently being served
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random ID. Never fails.
    pub fn generate() -> Self {
        Self::generate_with(getrandom::getrandom)
    }

    fn generate_with<F>(fill: F) -> Self
    where
        F: FnOnce(&mut [u8]) -> Result<(), getrandom::Error>,
    {
        let mut bytes = [0u8; 16];
        match fill(&mut bytes) {
            Ok(()) => Self(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Random source unavailable, using fallback correlation id");
                Self(FALLBACK_CORRELATION_ID.to_string())
            }
        }
    }

    /// Read a usable correlation ID from inbound headers, if any
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        [&CORRELATION_ID_HEADER, &X_CORRELATION_ID_HEADER]
            .into_iter()
            .filter_map(|name| headers.get(name))
            .filter_map(|value| value.to_str().ok())
            .map(str::trim)
            .find(|value| !value.is_empty() && value.len() <= MAX_CORRELATION_ID_LEN)
            .map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.0).ok()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Middleware that manages request correlation IDs
#[derive(Clone, Default)]
pub struct CorrelationIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for CorrelationIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CorrelationIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorrelationIdMiddlewareService { service }))
    }
}

pub struct CorrelationIdMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for CorrelationIdMiddlewareService<S>
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
        let correlation_id =
            CorrelationId::from_headers(req.headers()).unwrap_or_else(CorrelationId::generate);

        req.extensions_mut().insert(correlation_id.clone());

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            if let Some(value) = correlation_id.header_value() {
                res.headers_mut()
                    .insert(CORRELATION_ID_HEADER.clone(), value);
            }
            Ok(res)
        })
    }
}

/// Correlation ID of a request: the one stored by [`CorrelationIdMiddleware`], else one
/// read from the headers, else a fresh one.
pub fn get_correlation_id(req: &HttpRequest) -> CorrelationId {
    req.extensions()
        .get::<CorrelationId>()
        .cloned()
        .or_else(|| CorrelationId::from_headers(req.headers()))
        .unwrap_or_else(CorrelationId::generate)
}

impl FromRequest for CorrelationId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(get_correlation_id(req)))
    }
}
