use bookshelf_db::Database;
use bookshelf_kernel::Module;

use super::repository::SqlBookRepository;
use super::seed::seed_catalog;
use super::BooksModule;

/// In-memory database with the books schema applied.
pub async fn empty_database() -> Database {
    let db = Database::connect_in_memory().await.unwrap();
    let module = BooksModule::new(std::sync::Arc::new(SqlBookRepository::new(db.pool().clone())));
    let migrations: Vec<_> = module
        .migrations()
        .into_iter()
        .map(|migration| (module.name().to_string(), migration))
        .collect();
    db.apply_migrations(&migrations).await.unwrap();
    db
}

/// In-memory database holding the sample catalog with ids 1..=20.
pub async fn seeded_database() -> Database {
    let db = empty_database().await;
    seed_catalog(&SqlBookRepository::new(db.pool().clone()), false)
        .await
        .unwrap();
    db
}
