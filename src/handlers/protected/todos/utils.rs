// handlers/protected/todos/utils.rs - Path/query parsing shared by the todo handlers

use uuid::Uuid;

use crate::database::models::{Priority, Todo};
use crate::error::ApiError;
use crate::state::AppState;

/// Path ids that are not UUIDs cannot name any record.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("{} not found", what)))
}

pub fn parse_todo_id(raw: &str) -> Result<Uuid, ApiError> {
    parse_id(raw, "Todo")
}

/// Empty query values count as absent.
pub fn parse_priority(raw: Option<&str>) -> Result<Option<Priority>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Priority>()
            .map(Some)
            .map_err(|e| ApiError::field_error("priority", e.to_string())),
    }
}

pub fn parse_completed(raw: Option<&str>) -> Result<Option<bool>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some("true") => Ok(Some(true)),
        Some("false") => Ok(Some(false)),
        Some(other) => Err(ApiError::field_error(
            "completed",
            format!("must be true or false (got '{}')", other),
        )),
    }
}

/// Write back a modified todo; a vanished or foreign record is a 404.
pub async fn persist(state: &AppState, todo: &Todo, owner: Option<Uuid>) -> Result<(), ApiError> {
    if !state.todos().save(todo, owner).await? {
        return Err(ApiError::not_found("Todo not found"));
    }
    Ok(())
}
