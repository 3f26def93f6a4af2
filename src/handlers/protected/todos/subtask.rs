// handlers/protected/todos/subtask.rs - PUT /api/todos/:id/subtasks/:subtaskId handler

use axum::extract::{Path, State};

use crate::api::ApiJson;
use crate::database::models::{SubtaskPatch, Todo};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, OwnerScope};
use crate::state::AppState;

use super::utils::{parse_id, parse_todo_id, persist};

/// Merge `title`/`completed` into one subtask and return the parent todo.
pub async fn put(
    State(state): State<AppState>,
    OwnerScope(owner): OwnerScope,
    Path((id, subtask_id)): Path<(String, String)>,
    ApiJson(patch): ApiJson<SubtaskPatch>,
) -> ApiResult<Todo> {
    let id = parse_todo_id(&id)?;
    let subtask_id = parse_id(&subtask_id, "Subtask")?;

    let mut todo = state.todos().find_404(id, owner).await?;
    todo.subtask_mut(subtask_id)
        .ok_or_else(|| ApiError::not_found("Subtask not found"))?
        .merge(patch)?;
    todo.touch();

    persist(&state, &todo, owner).await?;
    Ok(ApiResponse::success(todo))
}
