use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{validate_jwt, Claims};
use crate::config::ApiMode;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
        }
    }
}

/// Why a request carried no usable bearer token.
#[derive(Debug, PartialEq)]
enum TokenProblem {
    Missing,
    Malformed(&'static str),
}

/// JWT authentication middleware that validates tokens and extracts user context.
///
/// No `Authorization` header is a 401; a header that is present but
/// unusable (wrong scheme, empty, bad signature, expired) is a 403.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match extract_bearer_token(request.headers()) {
        Ok(token) => token,
        Err(TokenProblem::Missing) => {
            tracing::warn!("Rejected {} {}: missing Authorization header", request.method(), request.uri().path());
            return Err(ApiError::unauthorized("Missing Authorization header"));
        }
        Err(TokenProblem::Malformed(msg)) => {
            tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), msg);
            return Err(ApiError::forbidden(msg));
        }
    };

    let claims = validate_jwt(token, &state.config.security.jwt_secret).map_err(|e| {
        tracing::warn!("Rejected {} {}: {}", request.method(), request.uri().path(), e);
        ApiError::from(e)
    })?;

    let auth_user = AuthUser::from(claims);
    tracing::debug!("Authenticated {} ({})", auth_user.username, auth_user.user_id);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, TokenProblem> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(TokenProblem::Missing)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| TokenProblem::Malformed("Invalid Authorization header format"))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or(TokenProblem::Malformed("Authorization header must use Bearer token format"))?
        .trim();

    if token.is_empty() {
        return Err(TokenProblem::Malformed("Empty JWT token"));
    }
    Ok(token)
}

/// Whose todos a request may see: the caller in authenticated mode,
/// everyone's (`None`) in open mode.
#[derive(Debug, Clone, Copy)]
pub struct OwnerScope(pub Option<Uuid>);

#[async_trait]
impl FromRequestParts<AppState> for OwnerScope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match (parts.extensions.get::<AuthUser>(), state.mode()) {
            (Some(user), _) => Ok(OwnerScope(Some(user.user_id))),
            (None, ApiMode::Open) => Ok(OwnerScope(None)),
            (None, ApiMode::Authenticated) => Err(ApiError::unauthorized("Authentication required")),
        }
    }
}
