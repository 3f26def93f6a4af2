mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use todo_api::config::ApiMode;

use common::{buy_milk, spawn_server, TestServer};

async fn create(server: &TestServer, body: Value) -> Result<Value> {
    let res = server.client.post(server.url("/api/todos")).json(&body).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED, "create failed for {}", body);
    Ok(res.json().await?)
}

async fn list(server: &TestServer, query: &str) -> Result<Vec<Value>> {
    let res = server.client.get(server.url(&format!("/api/todos{}", query))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(res.json().await?)
}

#[tokio::test]
async fn create_then_search() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;

    let created = create(&server, buy_milk()).await?;
    assert!(!created["id"].as_str().unwrap_or_default().is_empty());
    assert_eq!(created["completed"], false);
    assert_eq!(created["subtasks"], json!([]));
    assert_eq!(created["title"], "Buy milk");
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let found = list(&server, "?search=milk").await?;
    assert!(found.iter().any(|t| t["id"] == created["id"]), "search missed created todo: {:?}", found);
    Ok(())
}

#[tokio::test]
async fn create_ignores_server_managed_fields() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;

    let mut body = buy_milk();
    body["id"] = json!("00000000-0000-0000-0000-000000000001");
    body["completed"] = json!(true);
    body["createdAt"] = json!("2000-01-01T00:00:00Z");

    let created = create(&server, body).await?;
    assert_ne!(created["id"], "00000000-0000-0000-0000-000000000001");
    assert_eq!(created["completed"], false);
    assert_ne!(created["createdAt"], "2000-01-01T00:00:00Z");
    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_or_invalid_priority() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;

    for body in [
        json!({ "title": "x", "category": "c" }),
        json!({ "title": "x", "category": "c", "priority": "urgent" }),
        json!({ "title": "", "category": "c", "priority": "low" }),
    ] {
        let res = server.client.post(server.url("/api/todos")).json(&body).send().await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "accepted {}", body);
        let err = res.json::<Value>().await?;
        assert_eq!(err["error"], true);
    }

    assert!(list(&server, "").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_preserves_untouched_fields() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;
    let mut body = buy_milk();
    body["description"] = json!("2 litres");
    let created = create(&server, body).await?;
    let id = created["id"].as_str().unwrap_or_default();

    let res = server
        .client
        .put(server.url(&format!("/api/todos/{}", id)))
        .json(&json!({ "title": "Buy oat milk", "tags": ["dairy"] }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;

    assert_eq!(updated["title"], "Buy oat milk");
    assert_eq!(updated["tags"], json!(["dairy"]));
    assert_eq!(updated["description"], "2 litres");
    assert_eq!(updated["category"], created["category"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    let res = server
        .client
        .put(server.url(&format!("/api/todos/{}", id)))
        .json(&json!({ "description": null }))
        .send()
        .await?;
    let cleared = res.json::<Value>().await?;
    assert_eq!(cleared["description"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn toggle_twice_restores_completed() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;
    let created = create(&server, buy_milk()).await?;
    let url = server.url(&format!("/api/todos/{}/toggle", created["id"].as_str().unwrap_or_default()));

    let first = server.client.patch(&url).send().await?.json::<Value>().await?;
    assert_eq!(first["completed"], true);
    let second = server.client.patch(&url).send().await?.json::<Value>().await?;
    assert_eq!(second["completed"], false);
    Ok(())
}

#[tokio::test]
async fn delete_then_get_is_404() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;
    let created = create(&server, buy_milk()).await?;
    let url = server.url(&format!("/api/todos/{}", created["id"].as_str().unwrap_or_default()));

    let res = server.client.delete(&url).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "Todo deleted");
    assert_eq!(body["id"], created["id"]);

    assert_eq!(server.client.get(&url).send().await?.status(), StatusCode::NOT_FOUND);
    assert_eq!(server.client.delete(&url).send().await?.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_uuid_id_is_404() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;
    let res = server.client.get(server.url("/api/todos/42")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn subtask_update_merges_allowed_fields() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;
    let created = create(
        &server,
        json!({
            "title": "Pack",
            "priority": "medium",
            "category": "travel",
            "subtasks": [{ "title": "Socks" }, { "title": "Charger" }]
        }),
    )
    .await?;
    let id = created["id"].as_str().unwrap_or_default();
    let subtask_id = created["subtasks"][1]["id"].as_str().unwrap_or_default();

    let res = server
        .client
        .put(server.url(&format!("/api/todos/{}/subtasks/{}", id, subtask_id)))
        .json(&json!({ "completed": true, "id": "ignored" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let parent = res.json::<Value>().await?;
    assert_eq!(parent["subtasks"][1]["completed"], true);
    assert_eq!(parent["subtasks"][1]["id"], subtask_id);
    assert_eq!(parent["subtasks"][1]["title"], "Charger");
    assert_eq!(parent["subtasks"][0]["completed"], false);

    let res = server
        .client
        .put(server.url(&format!("/api/todos/{}/subtasks/{}", id, uuid_like())))
        .json(&json!({ "completed": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .client
        .put(server.url(&format!("/api/todos/{}/subtasks/{}", id, subtask_id)))
        .json(&json!({ "title": "  " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn subtask_ids_stay_unique_and_addressable() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;
    let supplied = uuid_like();
    let created = create(
        &server,
        json!({
            "title": "Pack",
            "priority": "medium",
            "category": "travel",
            "subtasks": [{ "id": supplied, "title": "A" }, { "id": supplied, "title": "B" }]
        }),
    )
    .await?;
    let first = created["subtasks"][0]["id"].as_str().unwrap_or_default().to_string();
    let second = created["subtasks"][1]["id"].as_str().unwrap_or_default().to_string();
    assert_ne!(first, supplied);
    assert_ne!(second, supplied);
    assert_ne!(first, second);

    let url = server.url(&format!("/api/todos/{}", created["id"].as_str().unwrap_or_default()));
    let res = server
        .client
        .put(&url)
        .json(&json!({
            "subtasks": [
                { "id": first, "title": "A" },
                { "id": first, "title": "A again" },
                { "id": uuid_like(), "title": "C" }
            ]
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<Value>().await?;
    let ids: Vec<&str> = updated["subtasks"]
        .as_array()
        .map(|subtasks| subtasks.iter().filter_map(|s| s["id"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], first);
    assert!(ids[1] != ids[0] && ids[2] != ids[0] && ids[1] != ids[2]);

    let res = server
        .client
        .put(format!("{}/subtasks/{}", url, ids[1]))
        .json(&json!({ "completed": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let parent = res.json::<Value>().await?;
    assert_eq!(parent["subtasks"][1]["completed"], true);
    assert_eq!(parent["subtasks"][0]["completed"], false);
    Ok(())
}

#[tokio::test]
async fn list_filters_combine() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;
    create(&server, json!({ "title": "Report", "priority": "high", "category": "work" })).await?;
    create(&server, json!({ "title": "Dentist", "priority": "high", "category": "health", "tags": ["Appointment"] })).await?;
    let done = create(&server, json!({ "title": "Email", "priority": "low", "category": "work" })).await?;
    server
        .client
        .patch(server.url(&format!("/api/todos/{}/toggle", done["id"].as_str().unwrap_or_default())))
        .send()
        .await?;

    assert_eq!(list(&server, "?category=work").await?.len(), 2);
    assert_eq!(list(&server, "?priority=high").await?.len(), 2);
    assert_eq!(list(&server, "?category=work&completed=true").await?.len(), 1);
    assert_eq!(list(&server, "?search=APPOINT").await?.len(), 1);
    assert_eq!(list(&server, "?category=").await?.len(), 3);

    let res = server.client.get(server.url("/api/todos?priority=urgent")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_is_newest_first() -> Result<()> {
    let server = spawn_server(ApiMode::Open).await?;
    for title in ["first", "second", "third"] {
        create(&server, json!({ "title": title, "priority": "low", "category": "c" })).await?;
    }

    let titles: Vec<Value> = list(&server, "").await?.into_iter().map(|t| t["title"].clone()).collect();
    assert_eq!(titles, vec![json!("third"), json!("second"), json!("first")]);
    Ok(())
}

fn uuid_like() -> &'static str {
    "6f1c7a52-6d0e-4b0e-9d55-3f1a2b3c4d5e"
}
