// handlers/public/auth/register.rs - POST /api/register handler

use axum::extract::State;
use serde_json::{json, Value};

use crate::api::ApiJson;
use crate::auth::hash_password;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::{validate_password, validate_username_format, Credentials};

/**
 * POST /api/register - Register new user account
 *
 * Expected Input:
 * ```json
 * { "username": "alice", "password": "at-least-8-chars" }
 * ```
 *
 * 201 `{ "message": "User registered" }`; 409 when the username is taken.
 */
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<Value> {
    validate_username_format(&body.username).map_err(|msg| ApiError::field_error("username", msg))?;
    validate_password(&body.password).map_err(|msg| ApiError::field_error("password", msg))?;

    let password_hash = hash_password(body.password, state.config.security.bcrypt_cost).await?;
    let user = User::new(body.username, password_hash);
    state.users().create(&user).await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);
    Ok(ApiResponse::created(json!({ "message": "User registered" })))
}
