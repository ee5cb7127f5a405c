use serde::Deserialize;
use utoipa::ToSchema;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::controller::ApiResponse;
use crate::{AppState, Error};
use domain::todo as TodoApi;
use domain::{todos::Model, Id};
use log::*;

/// Request body for PATCH /api/todos/{id}/complete.
/// A missing `completed` field marks the todo as not completed.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CompleteRequest {
    #[serde(default)]
    pub completed: bool,
}

/// GET all Todos, newest first
#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "Successfully retrieved all Todos", body = [domain::todos::Model]),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET all Todos");

    let todos = TodoApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), todos)))
}

/// POST create a new Todo
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = domain::todos::Model,
    responses(
        (status = 201, description = "Successfully Created a New Todo", body = [domain::todos::Model]),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(todo_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Todo from: {todo_model:?}");

    let todo = TodoApi::create(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        todo_model,
    )
    .await?;

    debug!("New Todo: {todo:?}");

    Ok(Json(ApiResponse::new(StatusCode::CREATED.into(), todo)))
}

/// GET a particular Todo specified by its id.
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(
        ("id" = Id, Path, description = "Todo id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Todo by its id", body = [domain::todos::Model]),
        (status = 404, description = "Todo not found"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Todo by id: {id}");

    let todo = TodoApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), todo)))
}

/// PUT overwrite a Todo's fields
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(
        ("id" = Id, Path, description = "Id of todo to update"),
    ),
    request_body = domain::todos::Model,
    responses(
        (status = 200, description = "Successfully Updated Todo", body = [domain::todos::Model]),
        (status = 404, description = "Todo not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(todo_model): Json<Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Todo with id: {id}");

    let todo = TodoApi::update(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
        todo_model,
    )
    .await?;

    debug!("Updated Todo: {todo:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), todo)))
}

/// PATCH set only a Todo's completed flag
#[utoipa::path(
    patch,
    path = "/api/todos/{id}/complete",
    params(
        ("id" = Id, Path, description = "Id of todo to update"),
    ),
    request_body = CompleteRequest,
    responses(
        (status = 200, description = "Successfully Updated Todo", body = [domain::todos::Model]),
        (status = 404, description = "Todo not found"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn update_completed(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(request): Json<CompleteRequest>,
) -> Result<impl IntoResponse, Error> {
    debug!("PATCH Todo {id} completed: {}", request.completed);

    let todo = TodoApi::set_completed(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
        request.completed,
    )
    .await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), todo)))
}

/// DELETE a Todo specified by its primary key.
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(
        ("id" = Id, Path, description = "Todo id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a certain Todo by its id", body = [Id]),
        (status = 404, description = "Todo not found"),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Todo by id: {id}");

    TodoApi::delete_by_id(
        app_state.db_conn_ref(),
        app_state.event_publisher.as_ref(),
        id,
    )
    .await?;

    Ok(Json(json!({"id": id})))
}
