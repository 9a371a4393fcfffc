//! HTTP handlers for `/api/books`.
//!
//! User-input and not-found outcomes are plain-text 200 responses. Text that
//! no backend can store is a 400. Only collection-wide operations surface
//! backend failures as server errors; the id-scoped ones answer [`NO_BOOK`]
//! whatever the cause and log the real one.

use anyhow::Context;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use shelf_http::{AppError, Payload};

use super::models::{required, AddComment, Book, BookSummary, CreateBook};
use super::store::{SharedStore, StoreError, StoreResult};

pub const MISSING_TITLE: &str = "missing required field title";
pub const MISSING_COMMENT: &str = "missing required field comment";
pub const NO_BOOK: &str = "no book exists";
pub const DELETED: &str = "delete successful";
pub const DELETED_ALL: &str = "complete delete successful";

/// Router for the books collection, relative to the module mount point.
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book).delete(delete_all_books))
        .route(
            "/{id}",
            get(get_book).post(add_comment).delete(delete_book),
        )
        .with_state(store)
}

async fn list_books(State(store): State<SharedStore>) -> Result<Json<Vec<BookSummary>>, AppError> {
    let books = store.list().await.context("failed to list books")?;
    Ok(Json(books))
}

async fn create_book(
    State(store): State<SharedStore>,
    Payload(body): Payload<CreateBook>,
) -> Result<Response, AppError> {
    let Some(title) = required(body.title) else {
        return Ok(MISSING_TITLE.into_response());
    };

    let created = match store.insert(&title).await {
        Ok(created) => created,
        Err(err @ StoreError::NulCharacter { .. }) => {
            return Err(AppError::bad_request(err.to_string()))
        }
        Err(err) => return Err(anyhow::Error::from(err).context("failed to create book").into()),
    };
    tracing::debug!(book_id = %created.id, "book created");
    Ok(Json(created).into_response())
}

async fn delete_all_books(State(store): State<SharedStore>) -> Result<&'static str, AppError> {
    let removed = store
        .delete_all()
        .await
        .context("failed to delete all books")?;
    tracing::info!(removed, "all books deleted");
    Ok(DELETED_ALL)
}

async fn get_book(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    book_or_missing(&id, "find", store.find(&id).await)
}

async fn add_comment(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Payload(body): Payload<AddComment>,
) -> Response {
    let Some(comment) = required(body.comment) else {
        return MISSING_COMMENT.into_response();
    };

    match store.append_comment(&id, &comment).await {
        Err(err @ StoreError::NulCharacter { .. }) => {
            AppError::bad_request(err.to_string()).into_response()
        }
        outcome => book_or_missing(&id, "append comment", outcome),
    }
}

async fn delete_book(State(store): State<SharedStore>, Path(id): Path<String>) -> Response {
    match store.delete(&id).await {
        Ok(true) => DELETED.into_response(),
        Ok(false) => NO_BOOK.into_response(),
        Err(err) => {
            log_masked_failure(&id, "delete", err);
            NO_BOOK.into_response()
        }
    }
}

fn book_or_missing(id: &str, operation: &str, outcome: StoreResult<Option<Book>>) -> Response {
    match outcome {
        Ok(Some(book)) => Json(book).into_response(),
        Ok(None) => NO_BOOK.into_response(),
        Err(err) => {
            log_masked_failure(id, operation, err);
            NO_BOOK.into_response()
        }
    }
}

/// The client only ever sees "no book exists" here; keep the cause in the logs.
fn log_masked_failure(id: &str, operation: &str, err: StoreError) {
    let err = anyhow::Error::from(err);
    tracing::warn!(
        book_id = %id,
        operation,
        error = %format!("{err:#}"),
        "backend failure reported to client as missing book"
    );
}
