//! # Actix Middleware Library
//!
//! Shared middleware for the todo and id services
//!
//! ## Modules
//! - `correlation_id`: correlation ID extraction/generation and the typed extractor
//! - `logging`: per-request server span, trace-context extraction and request logs

pub mod correlation_id;
pub mod logging;

pub use correlation_id::{
    get_correlation_id, CorrelationId, CorrelationIdMiddleware, CORRELATION_ID, CORRELATION_ID_HEADER,
    FALLBACK_CORRELATION_ID, X_CORRELATION_ID_HEADER,
};
pub use logging::RequestLogging;
