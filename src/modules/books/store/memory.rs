use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{check_text, BackendKind, BookStore, StoreError, StoreResult};
use crate::modules::books::models::{Book, BookId, BookSummary, CreatedBook};

/// Ordered in-process book list. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryBookStore {
    books: RwLock<Vec<Book>>,
}

impl MemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn list(&self) -> StoreResult<Vec<BookSummary>> {
        let books = self.books.read().await;
        Ok(books.iter().map(Book::summary).collect())
    }

    async fn insert(&self, title: &str) -> StoreResult<CreatedBook> {
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        check_text("title", title)?;

        let book = Book::new(title);
        let created = book.created();
        self.books.write().await.push(book);
        Ok(created)
    }

    async fn find(&self, id: &str) -> StoreResult<Option<Book>> {
        let Some(id) = BookId::parse(id) else {
            return Ok(None);
        };

        let books = self.books.read().await;
        Ok(books.iter().find(|book| book.id == id).cloned())
    }

    async fn append_comment(&self, id: &str, comment: &str) -> StoreResult<Option<Book>> {
        if comment.is_empty() {
            return Err(StoreError::EmptyComment);
        }
        check_text("comment", comment)?;
        let Some(id) = BookId::parse(id) else {
            return Ok(None);
        };

        let mut books = self.books.write().await;
        Ok(books.iter_mut().find(|book| book.id == id).map(|book| {
            book.comments.push(comment.to_string());
            book.clone()
        }))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let Some(id) = BookId::parse(id) else {
            return Ok(false);
        };

        let mut books = self.books.write().await;
        let Some(index) = books.iter().position(|book| book.id == id) else {
            return Ok(false);
        };
        books.remove(index);
        Ok(true)
    }

    async fn delete_all(&self) -> StoreResult<u64> {
        let mut books = self.books.write().await;
        let removed = books.len() as u64;
        books.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_list_preserves_order() {
        let store = MemoryBookStore::new();
        for title in ["Dune", "Emma", "Ulysses"] {
            store.insert(title).await.unwrap();
        }

        let titles: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|summary| {
                assert_eq!(summary.commentcount, 0);
                summary.title
            })
            .collect();
        assert_eq!(titles, ["Dune", "Emma", "Ulysses"]);
    }

    #[tokio::test]
    async fn insert_rejects_empty_title() {
        let store = MemoryBookStore::new();
        assert!(matches!(
            store.insert("").await,
            Err(StoreError::EmptyTitle)
        ));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comments_append_in_order() {
        let store = MemoryBookStore::new();
        let created = store.insert("Dune").await.unwrap();
        let id = created.id.to_string();

        store.append_comment(&id, "a").await.unwrap();
        let book = store.append_comment(&id, "b").await.unwrap().unwrap();

        assert_eq!(book.comments, ["a", "b"]);
        assert_eq!(store.list().await.unwrap()[0].commentcount, 2);
    }

    #[tokio::test]
    async fn append_to_unknown_book_is_none() {
        let store = MemoryBookStore::new();
        let missing = BookId::generate().to_string();
        assert!(store.append_comment(&missing, "hi").await.unwrap().is_none());
        assert!(matches!(
            store.append_comment(&missing, "").await,
            Err(StoreError::EmptyComment)
        ));
    }

    #[tokio::test]
    async fn nul_characters_are_rejected() {
        let store = MemoryBookStore::new();
        assert!(matches!(
            store.insert("a\0b").await,
            Err(StoreError::NulCharacter { field: "title" })
        ));
        assert!(store.list().await.unwrap().is_empty());

        let id = store.insert("Dune").await.unwrap().id.to_string();
        assert!(matches!(
            store.append_comment(&id, "x\0y").await,
            Err(StoreError::NulCharacter { field: "comment" })
        ));
        assert!(store.find(&id).await.unwrap().unwrap().comments.is_empty());
    }

    #[tokio::test]
    async fn malformed_ids_match_nothing() {
        let store = MemoryBookStore::new();
        store.insert("Dune").await.unwrap();

        assert!(store.find("bogus").await.unwrap().is_none());
        assert!(store.append_comment("bogus", "hi").await.unwrap().is_none());
        assert!(!store.delete("bogus").await.unwrap());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_only_target() {
        let store = MemoryBookStore::new();
        let keep = store.insert("Keep").await.unwrap();
        let gone = store.insert("Drop").await.unwrap();

        assert!(store.delete(&gone.id.to_string()).await.unwrap());
        assert!(!store.delete(&gone.id.to_string()).await.unwrap());
        assert!(store.find(&gone.id.to_string()).await.unwrap().is_none());
        assert!(store.find(&keep.id.to_string()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_all_is_idempotent() {
        let store = MemoryBookStore::new();
        store.insert("Dune").await.unwrap();
        store.insert("Emma").await.unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(store.delete_all().await.unwrap(), 0);
        assert!(store.list().await.unwrap().is_empty());
    }
}
