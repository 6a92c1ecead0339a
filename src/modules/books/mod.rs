pub mod models;
pub mod repository;
pub mod routes;
pub mod seed;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use routes::SharedRepository;

/// Books module: the catalog endpoints and the `books` table
pub struct BooksModule {
    repository: SharedRepository,
}

impl BooksModule {
    pub fn new(repository: SharedRepository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.repository.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };
        let ok = |schema: &str| {
            json!({
                "description": "OK",
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{schema}") }
                    }
                }
            })
        };
        let page_param = json!({
            "name": "page",
            "in": "query",
            "required": false,
            "schema": { "type": "integer", "default": 1 }
        });
        let id_param = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer" }
        });

        Some(json!({
            "paths": {
                "/books": {
                    "get": {
                        "summary": "List books, eight per page",
                        "tags": ["Books"],
                        "parameters": [page_param],
                        "responses": {
                            "200": ok("BookPage"),
                            "404": error("Page holds no books")
                        }
                    },
                    "post": {
                        "summary": "Create a book, or search titles when `search` is given",
                        "tags": ["Books"],
                        "parameters": [page_param],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "oneOf": [
                                            { "$ref": "#/components/schemas/SearchBooks" },
                                            { "$ref": "#/components/schemas/CreateBook" }
                                        ]
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Search results or the created book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "oneOf": [
                                                { "$ref": "#/components/schemas/BookPage" },
                                                { "$ref": "#/components/schemas/BookCreated" }
                                            ]
                                        }
                                    }
                                }
                            },
                            "400": error("Malformed or incomplete body")
                        }
                    }
                },
                "/books/{id}": {
                    "patch": {
                        "summary": "Update a book's rating",
                        "tags": ["Books"],
                        "parameters": [id_param],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/UpdateRating" }
                                }
                            }
                        },
                        "responses": {
                            "200": ok("RatingUpdated"),
                            "400": error("Malformed or missing body"),
                            "422": error("Book does not exist")
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [id_param, page_param],
                        "responses": {
                            "200": ok("BookDeleted"),
                            "422": error("Book does not exist")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "rating": { "type": "integer", "minimum": 1, "maximum": 5 }
                        },
                        "required": ["id", "title", "author", "rating"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "minLength": 1 },
                            "author": { "type": "string", "minLength": 1 },
                            "rating": { "type": "integer" }
                        },
                        "required": ["title", "author", "rating"]
                    },
                    "SearchBooks": {
                        "type": "object",
                        "properties": { "search": { "type": "string" } },
                        "required": ["search"]
                    },
                    "UpdateRating": {
                        "type": "object",
                        "properties": { "rating": { "type": "integer" } },
                        "required": ["rating"]
                    },
                    "BookPage": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" },
                            "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } },
                            "total_books": { "type": "integer" }
                        },
                        "required": ["success", "books", "total_books"]
                    },
                    "BookCreated": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" },
                            "created_id": { "type": "integer" },
                            "total_books": { "type": "integer" },
                            "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } }
                        },
                        "required": ["success", "created_id", "total_books", "books"]
                    },
                    "BookDeleted": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" },
                            "deleted_book": { "type": "integer" },
                            "books": { "type": "array", "items": { "$ref": "#/components/schemas/Book" } },
                            "total_books": { "type": "integer" }
                        },
                        "required": ["success", "deleted_book", "books", "total_books"]
                    },
                    "RatingUpdated": {
                        "type": "object",
                        "properties": {
                            "success": { "type": "boolean" },
                            "id": { "type": "integer" },
                            "rating": { "type": "integer" }
                        },
                        "required": ["success", "id", "rating"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id     INTEGER PRIMARY KEY AUTOINCREMENT,
                    title  TEXT    NOT NULL CHECK (title <> ''),
                    author TEXT    NOT NULL CHECK (author <> ''),
                    rating INTEGER NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(repository: SharedRepository) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(repository))
}
