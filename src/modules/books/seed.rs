//! Bundled sample catalog used by `bookshelf seed` and by tests.

use super::models::CreateBook;
use super::repository::{BookRepository, RepositoryResult};

/// (title, author, rating)
pub const SAMPLE_BOOKS: &[(&str, &str, i64)] = &[
    ("The Great Alone", "Kristin Hannah", 5),
    ("Educated: A Memoir", "Tara Westover", 5),
    ("Where the Crawdads Sing", "Delia Owens", 4),
    ("Circe: A Novel", "Madeline Miller", 5),
    ("Becoming", "Michelle Obama", 4),
    ("Pachinko: A Novel", "Min Jin Lee", 4),
    ("The Overstory", "Richard Powers", 3),
    ("Anxious People", "Fredrik Backman", 4),
    ("The Vanishing Half: A Novel", "Brit Bennett", 5),
    ("Project Hail Mary", "Andy Weir", 5),
    ("Klara and the Sun", "Kazuo Ishiguro", 3),
    ("The Midnight Library", "Matt Haig", 3),
    ("Hamnet: A Novel of the Plague", "Maggie O'Farrell", 4),
    ("Piranesi", "Susanna Clarke", 5),
    ("The Body Keeps the Score", "Bessel van der Kolk", 4),
    ("Sapiens", "Yuval Noah Harari", 4),
    ("Atomic Habits", "James Clear", 3),
    ("The Silent Patient", "Alex Michaelides", 2),
    ("Normal People", "Sally Rooney", 3),
    ("Born a Crime", "Trevor Noah", 5),
];

/// Insert the sample catalog.
///
/// A catalog that already holds books is left alone unless `force` is set.
/// Returns the number of books inserted.
pub async fn seed_catalog(repository: &dyn BookRepository, force: bool) -> RepositoryResult<usize> {
    if !force && !repository.list().await?.is_empty() {
        tracing::info!(target: "project.books", "catalog not empty, skipping seed");
        return Ok(0);
    }

    for (title, author, rating) in SAMPLE_BOOKS {
        let book = CreateBook {
            title: (*title).to_string(),
            author: (*author).to_string(),
            rating: *rating,
        };
        repository.create(&book).await?;
    }

    tracing::info!(target: "project.books", count = SAMPLE_BOOKS.len(), "sample catalog seeded");
    Ok(SAMPLE_BOOKS.len())
}
