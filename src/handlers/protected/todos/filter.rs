// handlers/protected/todos/filter.rs - GET /api/todos/filter handler

use axum::extract::State;
use serde::Deserialize;

use crate::api::ApiQuery;
use crate::database::models::{Priority, Todo};
use crate::error::ApiError;
use crate::filter::TodoFilter;
use crate::middleware::{ApiResponse, ApiResult, OwnerScope};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// Comma-separated, e.g. `high,medium`
    pub priorities: Option<String>,
}

/// GET /api/todos/filter?priorities=a,b - todos whose priority is in the set
pub async fn filter_get(
    State(state): State<AppState>,
    OwnerScope(owner): OwnerScope,
    ApiQuery(query): ApiQuery<FilterQuery>,
) -> ApiResult<Vec<Todo>> {
    let priorities = parse_priority_list(query.priorities.as_deref().unwrap_or(""))?;
    if priorities.is_empty() {
        return Ok(ApiResponse::success(vec![]));
    }

    let filter = TodoFilter::owned_by(owner).priorities(priorities);
    let todos = state.todos().list(&filter).await?;
    Ok(ApiResponse::success(todos))
}

fn parse_priority_list(raw: &str) -> Result<Vec<Priority>, ApiError> {
    let mut priorities = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let priority = entry
            .parse::<Priority>()
            .map_err(|e| ApiError::field_error("priorities", e.to_string()))?;
        if !priorities.contains(&priority) {
            priorities.push(priority);
        }
    }
    Ok(priorities)
}
