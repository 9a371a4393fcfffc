//! Durable book store on PostgreSQL.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS books (
//!     _id      UUID PRIMARY KEY,
//!     title    TEXT NOT NULL CHECK (title <> ''),
//!     comments TEXT[] NOT NULL DEFAULT '{}'
//! );
//! ```
//!
//! Ids are UUID v7, so ordering by `_id` returns books in insertion order.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use super::{check_text, BackendKind, BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookId, BookSummary, CreatedBook};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS books (
        _id      UUID PRIMARY KEY,
        title    TEXT NOT NULL CHECK (title <> ''),
        comments TEXT[] NOT NULL DEFAULT '{}'
    )
"#;

type BookRow = (Uuid, String, Vec<String>);

fn row_to_book((id, title, comments): BookRow) -> Book {
    Book {
        id: id.into(),
        title,
        comments,
    }
}

/// PostgreSQL-backed book store.
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    /// Wrap an existing pool, creating the `books` table if needed.
    pub async fn from_pool(pool: PgPool) -> StoreResult<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Postgres
    }

    async fn list(&self) -> StoreResult<Vec<BookSummary>> {
        let rows: Vec<(Uuid, String, i32)> = sqlx::query_as(
            "SELECT _id, title, cardinality(comments) FROM books ORDER BY _id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, count)| BookSummary {
                id: id.into(),
                title,
                commentcount: usize::try_from(count).unwrap_or_default(),
            })
            .collect())
    }

    async fn insert(&self, title: &str) -> StoreResult<CreatedBook> {
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        check_text("title", title)?;

        let id = BookId::generate();
        sqlx::query("INSERT INTO books (_id, title) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(title)
            .execute(&self.pool)
            .await?;

        Ok(CreatedBook {
            id,
            title: title.to_string(),
        })
    }

    async fn find(&self, id: &str) -> StoreResult<Option<Book>> {
        let Some(id) = BookId::parse(id) else {
            return Ok(None);
        };

        let row: Option<BookRow> =
            sqlx::query_as("SELECT _id, title, comments FROM books WHERE _id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(row_to_book))
    }

    async fn append_comment(&self, id: &str, comment: &str) -> StoreResult<Option<Book>> {
        if comment.is_empty() {
            return Err(StoreError::EmptyComment);
        }
        check_text("comment", comment)?;
        let Some(id) = BookId::parse(id) else {
            return Ok(None);
        };

        // Single statement, so a concurrent delete either wins outright or
        // sees the comment already appended.
        let row: Option<BookRow> = sqlx::query_as(
            r#"
            UPDATE books SET comments = array_append(comments, $2)
            WHERE _id = $1
            RETURNING _id, title, comments
            "#,
        )
        .bind(id.as_uuid())
        .bind(comment)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_book))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let Some(id) = BookId::parse(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM books WHERE _id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM books")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
