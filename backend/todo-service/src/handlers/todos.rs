/// Todo handlers - HTTP endpoints for todo CRUD operations
use actix_web::{web, HttpResponse};

use crate::context::RequestContext;
use crate::error::Result;
use crate::models::{CreateTodoRequest, UpdateTodoRequest};
use crate::services::TodoService;

/// List every todo
pub async fn list_todos(service: web::Data<TodoService>) -> Result<HttpResponse> {
    let todos = service.list_todos().await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Get a todo by ID
pub async fn get_todo(
    service: web::Data<TodoService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let todo = service.get_todo(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Create a todo. The identifier service is consulted before anything is stored.
pub async fn create_todo(
    service: web::Data<TodoService>,
    ctx: RequestContext,
    req: web::Json<CreateTodoRequest>,
) -> Result<HttpResponse> {
    let todo = service.create_todo(&ctx, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(todo))
}

/// Update a todo's title and/or description
pub async fn update_todo(
    service: web::Data<TodoService>,
    id: web::Path<i64>,
    req: web::Json<UpdateTodoRequest>,
) -> Result<HttpResponse> {
    let todo = service
        .update_todo(id.into_inner(), req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Delete a todo
pub async fn delete_todo(
    service: web::Data<TodoService>,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    service.delete_todo(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
