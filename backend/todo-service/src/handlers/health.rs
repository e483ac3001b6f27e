use actix_web::{web, HttpResponse};

use crate::services::TodoService;

/// Liveness check that also verifies storage
pub async fn health(service: web::Data<TodoService>) -> HttpResponse {
    match service.health_check().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unavailable" }))
        }
    }
}
