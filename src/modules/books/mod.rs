pub mod models;
pub mod routes;
pub mod store;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Module};

use store::SharedStore;

/// Books module: the catalog of books and their comment threads
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
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
            backend = %self.store.kind(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn text_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "text/plain": { "schema": { "type": "string" } }
        }
    })
}

fn json_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema }
        }
    })
}

fn server_error() -> serde_json::Value {
    json_response(
        "Internal server error",
        json!({ "$ref": "#/components/schemas/ErrorResponse" }),
    )
}

fn bad_request() -> serde_json::Value {
    json_response(
        "Text contains a NUL character",
        json!({ "$ref": "#/components/schemas/ErrorResponse" }),
    )
}

fn form_body(schema: &str) -> serde_json::Value {
    let schema_ref = json!({ "$ref": format!("#/components/schemas/{schema}") });
    json!({
        "content": {
            "application/json": { "schema": schema_ref },
            "application/x-www-form-urlencoded": { "schema": schema_ref }
        }
    })
}

fn id_parameter() -> serde_json::Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "string" }
    }])
}

fn openapi_fragment() -> serde_json::Value {
    let book_ref = json!({ "$ref": "#/components/schemas/Book" });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books with comment counts",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("All books", json!({
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/BookSummary" }
                        })),
                        "500": server_error()
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": form_body("CreateBook"),
                    "responses": {
                        "200": json_response(
                            "Created book, or the text 'missing required field title'",
                            json!({ "$ref": "#/components/schemas/CreatedBook" })
                        ),
                        "400": bad_request(),
                        "500": server_error()
                    }
                },
                "delete": {
                    "summary": "Delete every book",
                    "tags": ["Books"],
                    "responses": {
                        "200": text_response("complete delete successful"),
                        "500": server_error()
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book with its comments",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "responses": {
                        "200": json_response("The book, or the text 'no book exists'", book_ref.clone())
                    }
                },
                "post": {
                    "summary": "Append a comment",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "requestBody": form_body("AddComment"),
                    "responses": {
                        "200": json_response(
                            "The updated book, or the text 'missing required field comment' / 'no book exists'",
                            book_ref
                        ),
                        "400": bad_request()
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "responses": {
                        "200": text_response("'delete successful' or 'no book exists'")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Unique identifier for the book" },
                        "title": { "type": "string", "description": "Title of the book" },
                        "comments": {
                            "type": "array",
                            "items": { "type": "string" },
                            "description": "Comments in the order they were added"
                        }
                    },
                    "required": ["id", "title", "comments"]
                },
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "title": { "type": "string" },
                        "commentcount": { "type": "integer", "minimum": 0 }
                    },
                    "required": ["id", "title", "commentcount"]
                },
                "CreatedBook": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "title": { "type": "string" }
                    },
                    "required": ["id", "title"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "description": "Title of the book" }
                    },
                    "required": ["title"]
                },
                "AddComment": {
                    "type": "object",
                    "properties": {
                        "comment": { "type": "string" }
                    },
                    "required": ["comment"]
                }
            }
        }
    })
}

/// Create a new instance of the books module backed by `store`
pub fn create_module(store: SharedStore) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(store))
}
