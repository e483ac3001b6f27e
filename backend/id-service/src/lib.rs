//! Identifier Service Library
//!
//! Issues a fresh UUID v4 per request on `GET /id`. Requests are traced and
//! correlated with the same middleware stack as the todo service.

pub mod config;
pub mod handlers;

pub use config::Config;
pub use handlers::configure_routes;

/// Service name used for logs and traces
pub const SERVICE_NAME: &str = "id-service";
