use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to a book when it is stored.
///
/// UUID v7, so ids sort in creation order. Only the lowercase hyphenated form
/// the service hands out names a book; any other spelling is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    /// Mint a fresh, time-ordered identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse a client-supplied id; `None` for anything malformed.
    pub fn parse(raw: &str) -> Option<Self> {
        let uuid = Uuid::try_parse(raw).ok()?;
        (uuid.hyphenated().to_string() == raw).then_some(Self(uuid))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for BookId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A stored book with its full comment thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier for the book
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Comments in the order they were added
    pub comments: Vec<String>,
}

impl Book {
    /// A freshly created book: new id, no comments.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: BookId::generate(),
            title: title.into(),
            comments: Vec::new(),
        }
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            commentcount: self.comments.len(),
        }
    }

    pub fn created(&self) -> CreatedBook {
        CreatedBook {
            id: self.id,
            title: self.title.clone(),
        }
    }
}

/// List entry: the comment thread is reduced to its length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub commentcount: usize,
}

/// Response to a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBook {
    pub id: BookId,
    pub title: String,
}

/// Request body for creating a book. Fields are optional so a missing title
/// can be answered with the contract message instead of a rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBook {
    #[serde(default)]
    pub title: Option<String>,
}

/// Request body for appending a comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddComment {
    #[serde(default)]
    pub comment: Option<String>,
}

/// Returns the value only when it is present and non-empty.
pub fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}
