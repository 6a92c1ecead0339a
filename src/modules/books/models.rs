use serde::{de, Deserialize, Deserializer, Serialize};

/// A catalog entry as stored in the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Store-assigned identifier, never reused
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Reader rating, nominally 1-5
    pub rating: i64,
}

/// Request model for creating a new book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub rating: i64,
}

impl CreateBook {
    /// Title and author must be non-blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.author.trim().is_empty() {
            return Err("author must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request model for a title search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBooks {
    pub search: String,
}

/// Body of `POST /books`: a search when a `search` key is present,
/// otherwise a creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookCommand {
    Search(SearchBooks),
    Create(CreateBook),
}

impl<'de> Deserialize<'de> for BookCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = serde_json::Value::deserialize(deserializer)?;

        // The key alone picks the branch; a bad search never becomes a create.
        if body.get("search").is_some() {
            SearchBooks::deserialize(body)
                .map(BookCommand::Search)
                .map_err(de::Error::custom)
        } else {
            CreateBook::deserialize(body)
                .map(BookCommand::Create)
                .map_err(de::Error::custom)
        }
    }
}

/// Body of `PATCH /books/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UpdateRating {
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct BookPage {
    pub success: bool,
    pub books: Vec<Book>,
    pub total_books: usize,
}

#[derive(Debug, Serialize)]
pub struct RatingUpdated {
    pub success: bool,
    pub id: i64,
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct BookDeleted {
    pub success: bool,
    pub deleted_book: i64,
    pub books: Vec<Book>,
    pub total_books: usize,
}

#[derive(Debug, Serialize)]
pub struct BookCreated {
    pub success: bool,
    pub created_id: i64,
    pub total_books: usize,
    pub books: Vec<Book>,
}

/// Response of `POST /books`, shaped by the command that produced it.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CommandResponse {
    Search(BookPage),
    Created(BookCreated),
}
