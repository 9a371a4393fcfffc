//! Book storage backends.
//!
//! ```text
//!              BookStore
//!             ↑         ↑
//!   PgBookStore         MemoryBookStore
//!   (durable)           (process lifetime)
//! ```
//!
//! Exactly one backend is resolved at startup and shared by every request
//! until the process exits.

mod memory;
mod postgres;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use shelf_kernel::settings::DatabaseSettings;
use thiserror::Error;

use super::models::{Book, BookSummary, CreatedBook};

pub use memory::MemoryBookStore;
pub use postgres::PgBookStore;

/// The backend shared by all handlers.
pub type SharedStore = Arc<dyn BookStore>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("book title must not be empty")]
    EmptyTitle,

    #[error("comment must not be empty")]
    EmptyComment,

    /// Postgres `TEXT` cannot hold NUL, so neither backend stores it.
    #[error("{field} must not contain NUL characters")]
    NulCharacter { field: &'static str },

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// Shared input checks run by every backend before it touches storage.
pub(crate) fn check_text(field: &'static str, value: &str) -> StoreResult<()> {
    if value.contains('\0') {
        return Err(StoreError::NulCharacter { field });
    }
    Ok(())
}

/// Which backend variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Postgres,
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities every book backend provides.
///
/// Id-taking methods accept the raw client string. Each backend decides what
/// a well-formed id looks like; a malformed id behaves exactly like an id that
/// matches nothing.
#[async_trait]
pub trait BookStore: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// All books in insertion order.
    async fn list(&self) -> StoreResult<Vec<BookSummary>>;

    /// Store a new book with an empty comment thread.
    async fn insert(&self, title: &str) -> StoreResult<CreatedBook>;

    async fn find(&self, id: &str) -> StoreResult<Option<Book>>;

    /// Append `comment` and return the updated book, or `None` if no book matched.
    async fn append_comment(&self, id: &str, comment: &str) -> StoreResult<Option<Book>>;

    /// Returns whether a book was removed.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    /// Remove every book, returning how many were removed.
    async fn delete_all(&self) -> StoreResult<u64>;
}

/// Pick the backend for this process.
///
/// A configured and reachable database yields the durable store. Anything
/// else (no URL, connection failure, schema bootstrap failure) falls back to
/// memory. The durable connection is not retried afterwards.
pub async fn resolve(settings: &DatabaseSettings) -> SharedStore {
    let pool = match shelf_db::connect(settings).await {
        Ok(Some(pool)) => pool,
        Ok(None) => {
            tracing::info!(backend = %BackendKind::Memory, "using in-memory book store");
            return Arc::new(MemoryBookStore::new());
        }
        Err(err) => {
            tracing::warn!(
                backend = %BackendKind::Memory,
                error = %format!("{err:#}"),
                "database connection failed, using in-memory book store"
            );
            return Arc::new(MemoryBookStore::new());
        }
    };

    match PgBookStore::from_pool(pool).await {
        Ok(store) => {
            tracing::info!(backend = %BackendKind::Postgres, "connected to durable book store");
            Arc::new(store)
        }
        Err(err) => {
            tracing::warn!(
                backend = %BackendKind::Memory,
                error = %format!("{:#}", anyhow::Error::from(err)),
                "database schema setup failed, using in-memory book store"
            );
            Arc::new(MemoryBookStore::new())
        }
    }
}
