/// HTTP handlers for Todo Service
use actix_web::{error::JsonPayloadError, error::PathError, web, HttpRequest};

use crate::error::AppError;

pub mod health;
pub mod todos;

pub use health::health;
pub use todos::*;

/// Todo routes are served under both prefixes
pub const ROUTE_PREFIXES: [&str; 2] = ["/records", "/todo"];

/// Register every route plus the JSON/path rejection handlers
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .route("/health", web::get().to(health));

    for prefix in ROUTE_PREFIXES {
        cfg.service(
            web::scope(prefix)
                .route("", web::get().to(list_todos))
                .route("", web::post().to(create_todo))
                .route("/{id}", web::get().to(get_todo))
                .route("/{id}", web::put().to(update_todo))
                .route("/{id}", web::delete().to(delete_todo)),
        );
    }
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}
