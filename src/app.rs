use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{ApiMode, SecurityConfig};
use crate::error::{panic_response, ApiError};
use crate::handlers::{protected::todos, public};
use crate::middleware::{error_details_middleware, jwt_auth_middleware};
use crate::state::AppState;

/// Build the full router for the configured mode.
pub fn build_router(state: AppState) -> Router {
    let api = match state.mode() {
        ApiMode::Open => open_routes(),
        ApiMode::Authenticated => authenticated_routes(&state),
    };

    Router::new()
        .nest("/api", api)
        .fallback(route_not_found)
        // Global middleware, innermost first
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn_with_state(state.clone(), error_details_middleware))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn open_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health_get))
        .route("/todos", get(todos::list_get).post(todos::create_post))
        .route(
            "/todos/:id",
            get(todos::record_get).put(todos::record_put).delete(todos::record_delete),
        )
        .route("/todos/:id/toggle", patch(todos::record_toggle))
        .route("/todos/:id/subtasks/:subtask_id", put(todos::subtask_put))
}

fn authenticated_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/todos", get(todos::list_get).post(todos::create_post))
        .route("/todos/filter", get(todos::filter_get))
        .route(
            "/todos/:id",
            get(todos::record_get).put(todos::record_put).delete(todos::record_delete),
        )
        .route("/todos/:id/toggle", patch(todos::record_toggle))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/register", post(public::auth::register_post))
        .route("/login", post(public::auth::login_post))
        .merge(protected)
}

/// `*` allows any origin; an empty list sends no CORS headers.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
