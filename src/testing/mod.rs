//! Helpers for router-level unit tests against the in-memory backend.

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::auth::MIN_BCRYPT_COST;
use crate::config::{ApiMode, AppConfig};
use crate::database::DatabaseManager;
use crate::state::AppState;

/// Development profile on a fresh memory store, with the cheapest bcrypt cost.
pub fn test_state(mode: ApiMode) -> AppState {
    let mut config = AppConfig::development();
    config.mode = mode;
    config.security.bcrypt_cost = MIN_BCRYPT_COST;
    AppState::new(config, DatabaseManager::memory())
}

/// Send one request through the router and decode the JSON body
/// (`Value::Null` when empty).
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let credentials = json!({"username": username, "password": password});

    let (status, _) = request(app, Method::POST, "/api/register", Some(credentials.clone()), None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(app, Method::POST, "/api/login", Some(credentials), None).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}
