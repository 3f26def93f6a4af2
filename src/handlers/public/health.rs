// handlers/public/health.rs - GET /api/health handler

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::state::AppState;

/// Reports process liveness and storage reachability.
///
/// 200 with `status: "ok"` when the backend answers a ping, otherwise 503
/// with `status: "degraded"`.
pub async fn health_get(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.database.backend_name();
    let mode = state.mode().as_str();

    match state.database.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok",
                "backend": backend,
                "mode": mode,
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            let mut body = json!({
                "status": "degraded",
                "timestamp": now,
                "database": "unavailable",
                "backend": backend,
                "mode": mode,
            });
            if state.config.api.expose_error_details {
                body["database_error"] = json!(e.to_string());
            }
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}
