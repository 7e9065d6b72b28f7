use reqwest::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_links_crud() {
    let app = common::TestApp::spawn().await;

    // Create
    let resp = app
        .client
        .post(format!("{}/links", app.server_url))
        .json(&json!({
            "url": "https://example.com",
            "title": "Example",
            "description": "A great resource",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["url"].as_str().unwrap(), "https://example.com");

    // Read
    let resp = app.client.get(format!("{}/links/{id}", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(fetched["title"].as_str().unwrap(), "Example");

    // List contains it
    let resp = app.client.get(format!("{}/links", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let list: Vec<serde_json::Value> = resp.json().await.unwrap();
    assert!(list.iter().any(|l| l["id"].as_i64() == Some(id)));

    // Partial update leaves omitted fields alone
    let resp = app
        .client
        .patch(format!("{}/links/{id}", app.server_url))
        .json(&json!({ "title": "Renamed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(updated["title"].as_str().unwrap(), "Renamed");
    assert_eq!(updated["url"].as_str().unwrap(), "https://example.com");
    assert_eq!(updated["description"].as_str().unwrap(), "A great resource");

    // Delete, then it is gone
    let resp = app.client.delete(format!("{}/links/{id}", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.client.get(format!("{}/links/{id}", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_links_missing_id_is_not_found() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.get(format!("{}/links/999999999", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app
        .client
        .patch(format!("{}/links/999999999", app.server_url))
        .json(&json!({ "title": "Nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.client.delete(format!("{}/links/999999999", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_link_validation() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .client
        .post(format!("{}/links", app.server_url))
        .json(&json!({ "url": "", "title": "Example" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .client
        .post(format!("{}/links", app.server_url))
        .json(&json!({ "url": "https://example.com", "title": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
