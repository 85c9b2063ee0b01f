//! End-to-end tests for the HTTP surface

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use shelf::prelude::*;

fn test_server(dir: &tempfile::TempDir) -> TestServer {
    let config = AppConfig {
        state_path: dir.path().join("session.json"),
        ..Default::default()
    };
    let state = build_state(&config).expect("state builds");
    TestServer::new(build_router(state))
}

fn book_payload(title: &str, author: &str, year: i32, available: bool) -> Value {
    json!({
        "title": title,
        "author": author,
        "genre": "Fiction",
        "published_year": year,
        "available": available,
    })
}

async fn create_book(server: &TestServer, title: &str, year: i32) -> Value {
    let response = server
        .post("/books")
        .json(&book_payload(title, "Author", year, true))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn create_then_list_books() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let created = create_book(&server, "Kokoro", 1914).await;
    assert!(created["id"].is_string());
    assert_eq!(created["title"], "Kokoro");

    let response = server.get("/books").await;
    response.assert_status_ok();
    let page = response.json::<Value>();
    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["items"][0]["id"], created["id"]);
}

#[tokio::test]
async fn invalid_draft_is_rejected_with_field_errors() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let response = server
        .post("/books")
        .json(&book_payload("", "Author", 12, true))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "VALIDATION_FAILED");
    let fields: Vec<&str> = body["details"]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"published_year"));

    // Nothing was written
    let page = server.get("/books").await.json::<Value>();
    assert_eq!(page["meta"]["total"], 0);
}

#[tokio::test]
async fn patch_updates_only_present_fields() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let created = create_book(&server, "Kokoro", 1914).await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .patch(&format!("/books/{id}"))
        .json(&json!({"available": false}))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["title"], "Kokoro");
    assert_eq!(updated["available"], false);
}

#[tokio::test]
async fn patch_of_unknown_id_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let response = server
        .patch("/books/ghost")
        .json(&json!({"available": false}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unconfirmed_delete_leaves_list_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let created = create_book(&server, "Kokoro", 1914).await;
    let id = created["id"].as_str().unwrap();

    let response = server.delete(&format!("/books/{id}")).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["outcome"], "declined");
    assert_eq!(body["notice"]["level"], "info");

    let page = server.get("/books").await.json::<Value>();
    assert_eq!(page["meta"]["total"], 1);
}

#[tokio::test]
async fn confirmed_delete_removes_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let created = create_book(&server, "Kokoro", 1914).await;
    let id = created["id"].as_str().unwrap();

    let response = server
        .delete(&format!("/books/{id}"))
        .add_query_param("confirm", true)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["outcome"], "deleted");

    let page = server.get("/books").await.json::<Value>();
    assert_eq!(page["meta"]["total"], 0);

    // A second confirmed delete finds nothing
    let response = server
        .delete(&format!("/books/{id}"))
        .add_query_param("confirm", true)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_filters_shape_the_listing() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    create_book(&server, "The Tokyo Story", 1953).await;
    create_book(&server, "Kokoro", 1914).await;

    let response = server
        .put("/session/books/filters")
        .json(&json!({"title": "tok"}))
        .await;
    response.assert_status_ok();

    let page = server.get("/books").await.json::<Value>();
    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["items"][0]["title"], "The Tokyo Story");
}

#[tokio::test]
async fn session_pagination_walks_the_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    for i in 0..7 {
        create_book(&server, &format!("Book {i}"), 1950 + i).await;
    }

    let page = server.get("/books").await.json::<Value>();
    assert_eq!(page["items"].as_array().unwrap().len(), 5);
    assert_eq!(page["meta"]["total_pages"], 2);

    server
        .put("/session/books/page")
        .json(&json!({"page": 2}))
        .await
        .assert_status_ok();

    let page = server.get("/books").await.json::<Value>();
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    assert_eq!(page["meta"]["has_prev"], true);

    server
        .put("/session/books/page")
        .json(&json!({"page": 3}))
        .await
        .assert_status_ok();

    let page = server.get("/books").await.json::<Value>();
    assert_eq!(page["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn session_sort_orders_the_listing() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    create_book(&server, "Later", 1980).await;
    create_book(&server, "Earlier", 1920).await;

    server
        .put("/session/books/sort")
        .json(&json!({"field": "published_year", "direction": "desc"}))
        .await
        .assert_status_ok();

    let page = server.get("/books").await.json::<Value>();
    assert_eq!(page["items"][0]["title"], "Later");
    assert_eq!(page["items"][1]["title"], "Earlier");
}

#[tokio::test]
async fn filter_change_resets_the_page() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    server
        .put("/session/books/page")
        .json(&json!({"page": 4}))
        .await
        .assert_status_ok();

    let session = server
        .put("/session/books/filters")
        .json(&json!({"author": "soseki"}))
        .await
        .json::<Value>();

    assert_eq!(session["books"]["page"]["page"], 1);
    assert_eq!(session["books"]["filters"]["author"], "soseki");
}

#[tokio::test]
async fn table_fragment_carries_stable_row_ids() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let created = create_book(&server, "Kokoro", 1914).await;
    let id = created["id"].as_str().unwrap();

    let response = server.get("/books/table").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains(&format!(r#"<tr data-id="{id}">"#)));
    assert!(html.contains("<td>Kokoro</td>"));
}

#[tokio::test]
async fn member_crud_with_email_validation() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    let response = server
        .post("/members")
        .json(&json!({
            "name": "Aiko Tanaka",
            "email": "not-an-email",
            "joined_year": 2021,
            "active": true,
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/members")
        .json(&json!({
            "name": "Aiko Tanaka",
            "email": "aiko@example.com",
            "joined_year": 2021,
            "active": true,
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let page = server.get("/members").await.json::<Value>();
    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["items"][0]["email"], "aiko@example.com");
}

#[tokio::test]
async fn active_tab_round_trips_through_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(&dir);

    server
        .put("/session/tab")
        .json(&json!({"tab": "members"}))
        .await
        .assert_status_ok();

    let session = server.get("/session").await.json::<Value>();
    assert_eq!(session["active_tab"], "members");
}
