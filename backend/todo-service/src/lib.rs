//! Todo Service Library
//!
//! CRUD service for todo records. Creating a todo first obtains an identifier from the
//! id service, forwarding the request's correlation ID and W3C trace context.
//!
//! # Modules
//!
//! - `config`: Service configuration from `APP_*` environment variables
//! - `context`: Per-request correlation ID and span
//! - `error`: Error types and their HTTP rendering
//! - `handlers`: HTTP request handlers and route table
//! - `models`: Todo record and request bodies
//! - `repository`: Storage trait with in-memory and PostgreSQL backends
//! - `services`: Todo logic and the id service client

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod services;

pub use config::Config;
pub use context::RequestContext;
pub use error::{AppError, Result};
pub use handlers::configure_routes;

/// Service name used for logs, traces and pool labels
pub const SERVICE_NAME: &str = "todo-service";
