#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{json, Value};

use todo_api::auth::MIN_BCRYPT_COST;
use todo_api::config::{ApiMode, AppConfig};
use todo_api::database::DatabaseManager;
use todo_api::{build_router, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register then log in, returning the bearer token.
    pub async fn login_as(&self, username: &str, password: &str) -> Result<String> {
        let credentials = json!({ "username": username, "password": password });

        let res = self.client.post(self.url("/api/register")).json(&credentials).send().await?;
        anyhow::ensure!(res.status() == reqwest::StatusCode::CREATED, "register failed: {}", res.status());

        let res = self.client.post(self.url("/api/login")).json(&credentials).send().await?;
        anyhow::ensure!(res.status() == reqwest::StatusCode::OK, "login failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }
}

/// Start the router in-process on an unused port, backed by a fresh
/// in-memory store. Each test gets its own server and data.
pub async fn spawn_server(mode: ApiMode) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let mut config = AppConfig::development();
    config.mode = mode;
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;
    config.security.bcrypt_cost = MIN_BCRYPT_COST;

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", base_url))?;
    let app = build_router(AppState::new(config, DatabaseManager::memory()));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        port,
        base_url,
        client: reqwest::Client::new(),
    })
}

pub fn buy_milk() -> Value {
    json!({ "title": "Buy milk", "priority": "low", "category": "errand" })
}
