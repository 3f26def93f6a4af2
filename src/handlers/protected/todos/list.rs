// handlers/protected/todos/list.rs - GET /api/todos handler

use axum::extract::State;
use serde::Deserialize;

use crate::api::ApiQuery;
use crate::database::models::Todo;
use crate::filter::TodoFilter;
use crate::middleware::{ApiResponse, ApiResult, OwnerScope};
use crate::state::AppState;

use super::utils::{parse_completed, parse_priority};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<String>,
    pub search: Option<String>,
}

/// GET /api/todos - newest first, narrowed by any of `category`, `priority`,
/// `completed` and `search`
pub async fn list_get(
    State(state): State<AppState>,
    OwnerScope(owner): OwnerScope,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Vec<Todo>> {
    let filter = TodoFilter::owned_by(owner)
        .category(query.category)
        .priority(parse_priority(query.priority.as_deref())?)
        .completed(parse_completed(query.completed.as_deref())?)
        .search(query.search);

    let todos = state.todos().list(&filter).await?;
    Ok(ApiResponse::success(todos))
}
