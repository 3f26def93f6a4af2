mod common;

use anyhow::Result;
use reqwest::StatusCode;
use todo_api::config::ApiMode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server(ApiMode::Open).await?;

    let res = server.client.get(server.url("/api/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok", "unexpected body: {}", body);
    assert_eq!(body["database"], "ok");
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["mode"], "open");
    assert!(body.get("timestamp").is_some(), "missing timestamp: {}", body);
    Ok(())
}

#[tokio::test]
async fn unknown_route_returns_json_404() -> Result<()> {
    let server = common::spawn_server(ApiMode::Open).await?;

    let res = server.client.get(server.url("/api/nothing-here")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}
