//! API integration tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{
    api,
    repository::Repository,
    services::{clock::FixedClock, Services},
    AppState,
};

const BASE_URL: &str = "http://localhost:8080/api";
const CURRENT_YEAR: i32 = 2023;

fn app() -> Router {
    let services = Services::new(Repository::in_memory(), Arc::new(FixedClock(CURRENT_YEAR)));
    api::create_router(AppState {
        services: Arc::new(services),
    })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_book(app: &Router, book: Value) -> (StatusCode, Value) {
    let request = Request::post("/api/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(book.to_string()))
        .unwrap();
    send(app, request).await
}

fn book(title: &str, author: &str, genre: &str, year: i32) -> Value {
    json!({ "title": title, "author": author, "genre": genre, "publication_year": year })
}

async fn seed_five(app: &Router) {
    for (i, genre) in ["Horror", "Romance", "Poetry", "Fantasy", "Mystery"].iter().enumerate() {
        let payload = book(&format!("Book {}", i), "Some Author", genre, 2000 + i as i32);
        let (status, _) = post_book(app, payload).await;
        assert_eq!(status, StatusCode::OK);
    }
}

fn keys(body: &Value) -> Vec<&str> {
    body.as_object()
        .expect("body is an object")
        .keys()
        .map(String::as_str)
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/api/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_list_books_without_parameters() {
    let app = app();
    seed_five(&app).await;

    let (status, body) = get(&app, "/api/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), vec!["books"]);
    assert_eq!(body["books"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_books_by_genre() {
    let app = app();
    seed_five(&app).await;
    let (_, created) =
        post_book(&app, book("Dune", "Frank Herbert", "Science Fiction", 1965)).await;

    let (status, body) = get(&app, "/api/books?genre=Science%20Fiction").await;
    assert_eq!(status, StatusCode::OK);
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["id"], created["book"]["id"]);
}

#[tokio::test]
async fn test_list_books_by_author_and_title() {
    let app = app();
    seed_five(&app).await;
    post_book(&app, book("Emma", "Jane Austen", "Romance", 1815)).await;
    post_book(&app, book("Persuasion", "Jane Austen", "Romance", 1817)).await;

    let (_, body) = get(&app, "/api/books?author=Jane%20Austen").await;
    assert_eq!(body["books"].as_array().unwrap().len(), 2);

    let (_, body) = get(&app, "/api/books?author=Jane%20Austen&title=Emma").await;
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Emma");
}

#[tokio::test]
async fn test_list_books_ignores_blank_and_unknown_parameters() {
    let app = app();
    seed_five(&app).await;

    let (status, body) = get(&app, "/api/books?title=&publication_year=2001&page=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_books_no_match_is_empty() {
    let app = app();
    seed_five(&app).await;

    let (status, body) = get(&app, "/api/books?title=Impossible%20to%20exist").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), vec!["books"]);
    assert!(body["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_book() {
    let app = app();
    let (status, body) =
        post_book(&app, book("Dune", "Frank Herbert", "Science Fiction", 1965)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&body), vec!["book"]);
    assert!(body["book"]["id"].is_number());
    assert_eq!(body["book"]["title"], "Dune");
    assert_eq!(body["book"]["publication_year"], 1965);

    let (_, body) = get(&app, "/api/books").await;
    assert_eq!(body["books"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_book_wrapped_payload() {
    let app = app();
    let (status, body) = post_book(
        &app,
        json!({ "book": book("Dune", "Frank Herbert", "Science Fiction", 1965) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["author"], "Frank Herbert");
}

#[tokio::test]
async fn test_create_book_wrapped_payload_with_malformed_year() {
    let app = app();
    let payload = json!({
        "book": {
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "Science Fiction",
            "publication_year": "soon"
        }
    });
    let request = Request::post("/api/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("publication_year must be an integer"));
    assert!(!text.contains("can't be blank"));

    let (_, body) = get(&app, "/api/books").await;
    assert!(body["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_book_blank_fields() {
    let app = app();
    for field in ["title", "author", "genre"] {
        let mut payload = book("Dune", "Frank Herbert", "Science Fiction", 1965);
        payload[field] = json!("");

        let (status, body) = post_book(&app, payload).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(keys(&body), vec!["error"]);
        let mut expected = serde_json::Map::new();
        expected.insert(
            field.to_string(),
            json!(["can't be blank", "is too short (minimum is 2 characters)"]),
        );
        assert_eq!(body["error"], Value::Object(expected));
    }
}

#[tokio::test]
async fn test_create_book_future_year() {
    let app = app();
    let payload = book("Dune", "Frank Herbert", "Science Fiction", CURRENT_YEAR + 1);
    let (status, body) = post_book(&app, payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        json!({ "publication_year": ["must be less than or equal to 2023"] })
    );

    let (_, body) = get(&app, "/api/books").await;
    assert!(body["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_book_reports_every_violation() {
    let app = app();
    let payload = json!({ "title": "X", "genre": "", "publication_year": CURRENT_YEAR + 5 });
    let (status, body) = post_book(&app, payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        json!({
            "title": ["is too short (minimum is 2 characters)"],
            "author": ["can't be blank", "is too short (minimum is 2 characters)"],
            "genre": ["can't be blank", "is too short (minimum is 2 characters)"],
            "publication_year": ["must be less than or equal to 2023"]
        })
    );
}

#[tokio::test]
async fn test_create_book_without_year() {
    let app = app();
    let mut payload = book("Dune", "Frank Herbert", "Science Fiction", 1965);
    payload["publication_year"] = json!("");

    let (status, body) = post_book(&app, payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], json!({ "publication_year": ["can't be blank"] }));
}

#[tokio::test]
async fn test_create_existing_book() {
    let app = app();
    let payload = book("Dune", "Frank Herbert", "Science Fiction", 1965);

    let (status, _) = post_book(&app, payload.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_book(&app, payload).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        json!({ "uniqueness": ["Dune already been recommended before."] })
    );

    let (_, body) = get(&app, "/api/books?title=Dune").await;
    assert_eq!(body["books"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_openapi_document() {
    let app = app();
    let (status, body) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books"].is_object());
}

// Live server tests. Run with: cargo test -- --ignored

#[tokio::test]
#[ignore]
async fn test_live_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_live_list_books() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["books"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_live_create_invalid_book() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .json(&json!({
            "title": "",
            "author": "Frank Herbert",
            "genre": "Science Fiction",
            "publication_year": 1965
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"]["title"].is_array());
}
