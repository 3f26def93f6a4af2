// handlers/public/auth/login.rs - POST /api/login handler

use axum::extract::State;
use serde::Serialize;

use crate::api::ApiJson;
use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::utils::{Credentials, UserInfo};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserInfo,
}

/**
 * POST /api/login - Authenticate user and receive JWT token
 *
 * Expected Output (Success):
 * ```json
 * {
 *   "token": "eyJhbGciOiJIUzI1NiI...",
 *   "tokenType": "Bearer",
 *   "expiresIn": 3600,
 *   "user": { "id": "user_uuid", "username": "alice" }
 * }
 * ```
 *
 * Unknown username and wrong password produce the same 401.
 */
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<LoginResponse> {
    let Some(user) = state.users().find_by_username(&body.username).await? else {
        // Same bcrypt work as a real verify, so timing does not reveal unknown users
        hash_password(body.password, state.config.security.bcrypt_cost).await?;
        tracing::warn!("Failed login for unknown user {:?}", body.username);
        return Err(invalid_credentials());
    };

    if !verify_password(body.password, user.password_hash.clone()).await? {
        tracing::warn!("Failed login for {}: wrong password", user.username);
        return Err(invalid_credentials());
    }

    let expires_in = state.config.security.jwt_expiry_secs;
    let claims = Claims::new(user.id, user.username.clone(), expires_in);
    let token = generate_jwt(&claims, &state.config.security.jwt_secret)?;

    tracing::info!("User {} logged in", user.username);
    Ok(ApiResponse::success(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in,
        user: UserInfo {
            id: user.id,
            username: user.username,
        },
    }))
}

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}
