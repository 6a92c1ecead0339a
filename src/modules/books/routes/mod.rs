mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use bookshelf_http::error::method_not_allowed;

use super::repository::BookRepository;

pub type SharedRepository = Arc<dyn BookRepository>;

/// Routes of the books module; any other verb on these paths is a JSON 405.
pub fn router(repository: SharedRepository) -> Router {
    Router::new()
        .route(
            "/books",
            get(handlers::list_books)
                .post(handlers::create_or_search)
                .fallback(method_not_allowed),
        )
        .route(
            "/books/{id}",
            patch(handlers::update_rating)
                .delete(handlers::delete_book)
                .fallback(method_not_allowed),
        )
        .with_state(repository)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::repository::SqlBookRepository;
    use crate::modules::books::seed::SAMPLE_BOOKS;
    use crate::modules::books::testing::{empty_database, seeded_database};
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use bookshelf_db::Database;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(db: &Database) -> (Router, SqlBookRepository) {
        let repository = SqlBookRepository::new(db.pool().clone());
        (router(Arc::new(repository.clone())), repository)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_req(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_paginated_books() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, body) = send(&app, get_req("/books")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["total_books"], SAMPLE_BOOKS.len());
        assert_eq!(body["books"].as_array().unwrap().len(), 8);
        assert_eq!(body["books"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_second_page_continues_after_first() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, body) = send(&app, get_req("/books?page=3")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["books"].as_array().unwrap().len(), 4);
        assert_eq!(body["books"][0]["id"], 17);
    }

    #[tokio::test]
    async fn test_404_sent_requesting_beyond_valid_page() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, body) = send(&app, get_req("/books?page=1000")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Not Found");
    }

    #[tokio::test]
    async fn test_404_on_empty_catalog() {
        let db = empty_database().await;
        let (app, _) = app(&db);

        let (status, _) = send(&app, get_req("/books")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unparsable_page_falls_back_to_first() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, body) = send(&app, get_req("/books?page=abc")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["books"][0]["id"], 1);
    }

    #[tokio::test]
    async fn test_update_book_rating() {
        let db = seeded_database().await;
        let (app, repository) = app(&db);

        let (status, body) = send(&app, json_req("PATCH", "/books/5", json!({"rating": 1}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["id"], 5);
        assert_eq!(body["rating"], 1);
        assert_eq!(repository.get(5).await.unwrap().unwrap().rating, 1);
    }

    #[tokio::test]
    async fn test_400_for_failed_update() {
        let db = seeded_database().await;
        let (app, repository) = app(&db);
        let before = repository.get(5).await.unwrap().unwrap();

        let (status, body) = send(&app, empty_req("PATCH", "/books/5")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Bad Request");
        assert_eq!(repository.get(5).await.unwrap().unwrap(), before);
    }

    #[tokio::test]
    async fn test_400_takes_precedence_over_unknown_id() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, _) = send(&app, json_req("PATCH", "/books/1000", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_422_for_update_of_missing_book() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, body) =
            send(&app, json_req("PATCH", "/books/1000", json!({"rating": 2}))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Unprocessable");
    }

    #[tokio::test]
    async fn test_delete_book() {
        let db = seeded_database().await;
        let (app, repository) = app(&db);

        let (status, body) = send(&app, empty_req("DELETE", "/books/15")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["deleted_book"], 15);
        assert_eq!(body["total_books"], SAMPLE_BOOKS.len() - 1);
        assert_eq!(body["books"].as_array().unwrap().len(), 8);
        assert!(repository.get(15).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_422_if_book_does_not_exist() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, body) = send(&app, empty_req("DELETE", "/books/1000")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Unprocessable");
    }

    #[tokio::test]
    async fn test_create_new_book() {
        let db = seeded_database().await;
        let (app, repository) = app(&db);
        let new_book = json!({"title": "Anansi Boys", "author": "Neil Gaiman", "rating": 5});

        let (status, body) = send(&app, json_req("POST", "/books", new_book)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["total_books"], SAMPLE_BOOKS.len() + 1);
        assert_eq!(body["books"].as_array().unwrap().len(), 8);

        let created_id = body["created_id"].as_i64().unwrap();
        assert!(created_id > 0);
        let stored = repository.get(created_id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Anansi Boys");
    }

    #[tokio::test]
    async fn test_400_for_incomplete_book() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, body) =
            send(&app, json_req("POST", "/books", json!({"title": "Anansi Boys"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let blank = json!({"title": "", "author": "Neil Gaiman", "rating": 5});
        let (status, _) = send(&app, json_req("POST", "/books", blank)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_405_if_book_creation_not_allowed() {
        let db = seeded_database().await;
        let (app, _) = app(&db);
        let new_book = json!({"title": "Anansi Boys", "author": "Neil Gaiman", "rating": 5});

        let (status, body) = send(&app, json_req("POST", "/books/30", new_book)).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Method Not Allowed");
    }

    #[tokio::test]
    async fn test_search_book_with_results() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, body) = send(&app, json_req("POST", "/books", json!({"search": "Novel"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["books"].as_array().unwrap().len(), 4);
        assert_eq!(body["total_books"], 4);
    }

    #[tokio::test]
    async fn test_search_book_without_results() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let (status, body) = send(&app, json_req("POST", "/books", json!({"search": "sjekj"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["total_books"], 0);
        assert_eq!(body["books"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_400_for_repeated_page_parameter() {
        let db = seeded_database().await;
        let (app, _) = app(&db);

        let response = app.clone().oneshot(get_req("/books?page=1&page=2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["content-type"], "application/json");

        let (status, body) = send(&app, get_req("/books?page=1&page=2")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Bad Request");
    }

    #[tokio::test]
    async fn test_400_for_mistyped_search_without_creating() {
        let db = seeded_database().await;
        let (app, repository) = app(&db);
        let body = json!({"search": 42, "title": "Anansi Boys", "author": "Neil Gaiman", "rating": 5});

        let (status, body) = send(&app, json_req("POST", "/books", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(repository.list().await.unwrap().len(), SAMPLE_BOOKS.len());
    }
}
