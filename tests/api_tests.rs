//! API integration tests
//!
//! The router runs in-process over the in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use bookshelf_server::{api, repository::InMemoryRepository, AppConfig, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_router() -> Router {
    let state = AppState::new(
        AppConfig::default(),
        Arc::new(InMemoryRepository::new()),
        None,
    );
    api::create_router(state)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(format!("/api/v1{}", uri));
    let request = match body {
        Some(payload) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&payload).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn dune() -> Value {
    json!({
        "title": "  Dune ",
        "publication_year": 1965,
        "author_first_name": "Frank",
        "author_last_name": "Herbert",
        "genre_name": "Science Fiction"
    })
}

#[tokio::test]
async fn test_health_and_readiness() {
    let router = test_router();

    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&router, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_book_lifecycle() {
    let router = test_router();

    let (status, created) = send(&router, Method::POST, "/books", Some(dune())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Dune");
    assert_eq!(created["author_last_name"], "Herbert");
    assert_eq!(created["genre_name"], "Science Fiction");
    let id = created["id"].as_i64().unwrap();

    let (status, fetched) = send(&router, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, patched) = send(
        &router,
        Method::PATCH,
        &format!("/books/{}", id),
        Some(json!({ "genre_name": "Classics" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["genre_name"], "Classics");
    assert_eq!(patched["publication_year"], 1965);

    let (status, updated) = send(
        &router,
        Method::PUT,
        &format!("/books/{}", id),
        Some(json!({
            "id": id,
            "title": "Dune",
            "publication_year": 1966,
            "author_first_name": "Brian",
            "author_last_name": "Herbert",
            "genre_name": "Classics"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["author_first_name"], "Brian");
    assert_eq!(updated["publication_year"], 1966);

    let (status, _) = send(&router, Method::DELETE, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&router, Method::GET, &format!("/books/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchEntity");
}

#[tokio::test]
async fn test_error_mapping() {
    let router = test_router();
    let (_, created) = send(&router, Method::POST, "/books", Some(dune())).await;
    let id = created["id"].as_i64().unwrap();

    // Duplicate title and year
    let mut duplicate = dune();
    duplicate["title"] = json!("DUNE");
    let (status, body) = send(&router, Method::POST, "/books", Some(duplicate)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Duplicate");

    // Blank title
    let mut blank = dune();
    blank["title"] = json!("   ");
    let (status, body) = send(&router, Method::POST, "/books", Some(blank)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    // Explicit null in a patch
    let (status, _) = send(
        &router,
        Method::PATCH,
        &format!("/books/{}", id),
        Some(json!({ "title": null })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Path and body ids differ
    let mut mismatch = dune();
    mismatch["id"] = json!(id + 1);
    let (status, _) = send(&router, Method::PUT, &format!("/books/{}", id), Some(mismatch)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_values() {
    let router = test_router();

    let mut missing_genre = dune();
    missing_genre.as_object_mut().unwrap().remove("genre_name");
    let (status, body) = send(&router, Method::POST, "/books", Some(missing_genre)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
    assert_eq!(body["code"], 18);

    let (status, body) = send(
        &router,
        Method::POST,
        "/reviews",
        Some(json!({
            "review_text": "Spice must flow",
            "reviewer_first_name": "Teddy",
            "reviewer_last_name": "Smith"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    // Wrong type in a patch
    let (status, body) = send(
        &router,
        Method::PATCH,
        "/books/1",
        Some(json!({ "publication_year": "soon" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    // Nothing was stored
    let (_, books) = send(&router, Method::GET, "/books", None).await;
    assert!(books.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_reviews_follow_their_book() {
    let router = test_router();
    let (_, book) = send(&router, Method::POST, "/books", Some(dune())).await;
    let book_id = book["id"].as_i64().unwrap();

    let (status, _) = send(
        &router,
        Method::POST,
        "/reviews",
        Some(json!({
            "book_title": "Unknown",
            "review_text": "?",
            "reviewer_first_name": "Teddy",
            "reviewer_last_name": "Smith"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for (first, last) in [("Teddy", "Smith"), ("Taylor", "Jones")] {
        let (status, review) = send(
            &router,
            Method::POST,
            "/reviews",
            Some(json!({
                "book_title": "dune",
                "review_text": "Spice must flow",
                "reviewer_first_name": first,
                "reviewer_last_name": last
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(review["book_title"], "Dune");
        assert_eq!(review["book_id"], book_id);
    }

    let (status, reviews) =
        send(&router, Method::GET, &format!("/reviews/by-book/{}", book_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 2);

    let review_id = reviews[0]["id"].as_i64().unwrap();
    let (status, _) = send(
        &router,
        Method::PATCH,
        &format!("/reviews/{}", review_id),
        Some(json!({ "reviewer_first_name": "Jessica" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(&router, Method::DELETE, &format!("/books/{}", book_id), None).await;
    let (_, reviews) = send(&router, Method::GET, "/reviews", None).await;
    assert!(reviews.as_array().unwrap().is_empty());

    // Reviewers survive the cascade
    let (_, reviewers) = send(&router, Method::GET, "/reviewers", None).await;
    assert_eq!(reviewers.as_array().unwrap().len(), 2);
    assert_eq!(reviewers[0]["last_name"], "Jones");
}

#[tokio::test]
async fn test_author_and_genre_endpoints() {
    let router = test_router();
    let (_, book) = send(&router, Method::POST, "/books", Some(dune())).await;

    let (status, authors) = send(&router, Method::GET, "/authors", None).await;
    assert_eq!(status, StatusCode::OK);
    let author_id = authors[0]["id"].as_i64().unwrap();

    let (status, books) =
        send(&router, Method::GET, &format!("/authors/{}/books", author_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books[0]["id"], book["id"]);

    let (status, _) = send(&router, Method::DELETE, &format!("/authors/{}", author_id), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &router,
        Method::POST,
        "/genres",
        Some(json!({ "name": "science fiction" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, genres) = send(&router, Method::GET, "/genres", None).await;
    let genre_id = genres[0]["id"].as_i64().unwrap();
    let (status, _) = send(&router, Method::DELETE, &format!("/genres/{}", genre_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let book_id = book["id"].as_i64().unwrap();
    let (_, reloaded) = send(&router, Method::GET, &format!("/books/{}", book_id), None).await;
    assert_eq!(reloaded["genre_name"], Value::Null);
    assert_eq!(reloaded["author_last_name"], "Herbert");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let router = test_router();
    let request = Request::builder()
        .uri("/api-docs/openapi.json")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
