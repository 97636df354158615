//! HTTP handlers: parse the request, call the store, wrap the result.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::model::{CreateTodo, Todo, UpdateTodo};
use crate::store::TodoStore;

/// The one store for the process, owned by the router state.
pub type SharedStore = Arc<RwLock<TodoStore>>;

pub type ApiResult<T> = Result<(StatusCode, Json<Envelope<T>>), ApiError>;

const RETRIEVED: &str = "Data retrieved successfully";

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub todos: usize,
}

fn respond<T>(status: StatusCode, message: &str, data: T) -> ApiResult<T> {
    Ok((status, Json(Envelope::success(message, data))))
}

/// Ids are positive base-10 integers.
fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::Validation(format!("Invalid to-do ID: {raw}")))
}

fn todo_id(path: Result<Path<String>, PathRejection>) -> Result<u64, ApiError> {
    let Path(raw) = path?;
    parse_id(&raw)
}

pub async fn list_todos(State(store): State<SharedStore>) -> ApiResult<Vec<Todo>> {
    let store = store.read().await;
    respond(StatusCode::OK, RETRIEVED, store.list().to_vec())
}

pub async fn get_todo(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Todo> {
    let id = todo_id(path)?;
    let store = store.read().await;
    let todo = store.get(id)?.clone();
    respond(StatusCode::OK, RETRIEVED, todo)
}

pub async fn create_todo(
    State(store): State<SharedStore>,
    payload: Result<Json<CreateTodo>, JsonRejection>,
) -> ApiResult<Todo> {
    let Json(input) = payload?;
    let todo = store.write().await.create(input)?;
    tracing::info!(id = todo.id, "created todo");
    respond(StatusCode::CREATED, "To-do created successfully", todo)
}

pub async fn update_todo(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateTodo>, JsonRejection>,
) -> ApiResult<Todo> {
    let id = todo_id(path)?;
    let Json(patch) = payload?;
    let todo = store.write().await.update(id, patch)?;
    respond(StatusCode::OK, "To-do updated successfully", todo)
}

pub async fn delete_todo(
    State(store): State<SharedStore>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Todo> {
    let id = todo_id(path)?;
    let todo = store.write().await.delete(id)?;
    tracing::info!(id, "deleted todo");
    respond(StatusCode::OK, "To-do deleted successfully", todo)
}

pub async fn health(State(store): State<SharedStore>) -> ApiResult<Health> {
    let todos = store.read().await.len();
    let health = Health {
        status: "ok",
        timestamp: Utc::now(),
        todos,
    };
    respond(StatusCode::OK, "Service is healthy", health)
}

pub async fn route_not_found() -> (StatusCode, Json<Envelope<()>>) {
    (StatusCode::NOT_FOUND, Json(Envelope::error("Route not found")))
}

pub async fn method_not_allowed() -> (StatusCode, Json<Envelope<()>>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(Envelope::error("Method not allowed")),
    )
}
