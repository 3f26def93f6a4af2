// handlers/protected/todos/create.rs - POST /api/todos handler

use axum::extract::State;

use crate::api::ApiJson;
use crate::database::models::{NewTodo, Todo};
use crate::middleware::{ApiResponse, ApiResult, OwnerScope};
use crate::state::AppState;

/**
 * POST /api/todos - Create a todo
 *
 * Expected Input:
 * ```json
 * {
 *   "title": "Buy milk",        // Required
 *   "priority": "low",          // Required: low | medium | high
 *   "category": "errand",       // Required
 *   "description": "2 litres",
 *   "tags": ["shopping"],
 *   "dueDate": "2030-01-01",
 *   "subtasks": [{ "title": "Find wallet" }]
 * }
 * ```
 *
 * `id`, timestamps, `completed` and subtask ids are assigned here; client
 * values for them are ignored.
 */
pub async fn create_post(
    State(state): State<AppState>,
    OwnerScope(owner): OwnerScope,
    ApiJson(body): ApiJson<NewTodo>,
) -> ApiResult<Todo> {
    let todo = Todo::create(body, owner)?;
    state.todos().insert(&todo).await?;

    tracing::debug!("Created todo {}", todo.id);
    Ok(ApiResponse::created(todo))
}
