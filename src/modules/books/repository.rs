use async_trait::async_trait;
use bookshelf_http::AppError;
use sqlx::SqlitePool;

use super::models::{Book, CreateBook};

#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Internal(err.into())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence boundary for books.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Inserts a book and returns the id assigned by the store
    async fn create(&self, book: &CreateBook) -> RepositoryResult<i64>;
    /// All books ordered by id
    async fn list(&self) -> RepositoryResult<Vec<Book>>;
    async fn get(&self, id: i64) -> RepositoryResult<Option<Book>>;
    /// Writes every mutable field; returns false if the id is unknown
    async fn update(&self, book: &Book) -> RepositoryResult<bool>;
    /// Returns true if the book existed and was deleted
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
    /// Case-insensitive substring match on the title, ordered by id
    async fn search(&self, term: &str) -> RepositoryResult<Vec<Book>>;
}

/// SQL-backed repository over the `books` table.
#[derive(Clone, Debug)]
pub struct SqlBookRepository {
    pool: SqlitePool,
}

impl SqlBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRepository for SqlBookRepository {
    async fn create(&self, book: &CreateBook) -> RepositoryResult<i64> {
        let result = sqlx::query("INSERT INTO books (title, author, rating) VALUES (?, ?, ?)")
            .bind(book.title.trim())
            .bind(book.author.trim())
            .bind(book.rating)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    async fn list(&self) -> RepositoryResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, rating FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    async fn get(&self, id: i64) -> RepositoryResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, rating FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    async fn update(&self, book: &Book) -> RepositoryResult<bool> {
        let result =
            sqlx::query("UPDATE books SET title = ?, author = ?, rating = ? WHERE id = ?")
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.rating)
                .bind(book.id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, term: &str) -> RepositoryResult<Vec<Book>> {
        // instr() keeps % and _ in the term literal, unlike LIKE
        let books = sqlx::query_as::<_, Book>(
            "SELECT id, title, author, rating FROM books \
             WHERE instr(lower(title), lower(?)) > 0 ORDER BY id",
        )
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}
