// handlers/protected/todos/record.rs - Single-todo handlers

use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use crate::api::ApiJson;
use crate::database::models::{Todo, TodoUpdate};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, OwnerScope};
use crate::state::AppState;

use super::utils::{parse_todo_id, persist};

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
    pub id: Uuid,
}

/// GET /api/todos/:id
pub async fn get(
    State(state): State<AppState>,
    OwnerScope(owner): OwnerScope,
    Path(id): Path<String>,
) -> ApiResult<Todo> {
    let id = parse_todo_id(&id)?;
    let todo = state.todos().find_404(id, owner).await?;
    Ok(ApiResponse::success(todo))
}

/// PUT /api/todos/:id - partial update; `null` clears `description`/`dueDate`
pub async fn put(
    State(state): State<AppState>,
    OwnerScope(owner): OwnerScope,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TodoUpdate>,
) -> ApiResult<Todo> {
    let id = parse_todo_id(&id)?;
    let mut todo = state.todos().find_404(id, owner).await?;
    todo.apply_update(body)?;
    persist(&state, &todo, owner).await?;
    Ok(ApiResponse::success(todo))
}

/// DELETE /api/todos/:id
pub async fn delete(
    State(state): State<AppState>,
    OwnerScope(owner): OwnerScope,
    Path(id): Path<String>,
) -> ApiResult<Deleted> {
    let id = parse_todo_id(&id)?;
    if !state.todos().delete(id, owner).await? {
        return Err(ApiError::not_found("Todo not found"));
    }
    tracing::debug!("Deleted todo {}", id);
    Ok(ApiResponse::success(Deleted { message: "Todo deleted", id }))
}

/// PATCH /api/todos/:id/toggle - flip `completed`
pub async fn toggle(
    State(state): State<AppState>,
    OwnerScope(owner): OwnerScope,
    Path(id): Path<String>,
) -> ApiResult<Todo> {
    let id = parse_todo_id(&id)?;
    let mut todo = state.todos().find_404(id, owner).await?;
    todo.toggle();
    persist(&state, &todo, owner).await?;
    Ok(ApiResponse::success(todo))
}
