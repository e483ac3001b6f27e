/// HTTP handlers for the identifier service
use actix_middleware::CorrelationId;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Reply body of `GET /id`
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: String,
}

/// Issue a fresh identifier
pub async fn issue_id(correlation_id: CorrelationId) -> HttpResponse {
    let id = Uuid::new_v4().to_string();
    info!(correlation_id = %correlation_id, uuid = %id, "Issued identifier");
    HttpResponse::Ok().json(IdResponse { id })
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/id", web::get().to(issue_id))
        .route("/health", web::get().to(health));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_middleware::{CorrelationIdMiddleware, RequestLogging};
    use actix_web::{test, App};

    #[derive(serde::Deserialize)]
    struct Reply {
        id: String,
    }

    #[actix_web::test]
    async fn test_issue_id_returns_uuid() {
        let app = test::init_service(App::new().configure(configure_routes)).await;

        let first: Reply =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/id").to_request())
                .await;
        let second: Reply =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/id").to_request())
                .await;

        let parsed = Uuid::parse_str(&first.id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_ne!(first.id, second.id);
    }

    #[actix_web::test]
    async fn test_correlation_id_is_echoed() {
        let _guard = tracing::subscriber::set_default(tracing_subscriber::registry());
        let app = test::init_service(
            App::new()
                .wrap(RequestLogging)
                .wrap(CorrelationIdMiddleware)
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/id")
            .insert_header(("CorrelationId", "abc-123"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(resp.headers().get("correlationid").unwrap(), "abc-123");
    }

    #[actix_web::test]
    async fn test_only_get_is_routed() {
        let app = test::init_service(App::new().configure(configure_routes)).await;
        let resp =
            test::call_service(&app, test::TestRequest::post().uri("/id").to_request()).await;
        assert!(resp.status().is_client_error());
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(App::new().configure(configure_routes)).await;
        let body: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
                .await;
        assert_eq!(body, serde_json::json!({ "status": "ok" }));
    }
}
