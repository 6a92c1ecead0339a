//! Wiring between settings, the database, the module registry, and the server.

use std::future::Future;

use anyhow::Context;
use bookshelf_db::Database;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules::{self, books};

/// Connected database plus the registry of modules built on it.
pub struct Application {
    db: Database,
    registry: ModuleRegistry,
}

impl Application {
    /// Connect to the store, register modules, and apply pending migrations.
    pub async fn prepare(settings: &Settings) -> anyhow::Result<Self> {
        let db = Database::connect(&settings.database)
            .await
            .context("failed to open database")?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &db);

        let applied = db
            .apply_migrations(&registry.collect_migrations())
            .await
            .context("failed to apply migrations")?;
        tracing::info!(applied, "migrations up to date");

        Ok(Self { db, registry })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }
}

/// Run the HTTP service until `shutdown` resolves, then stop modules and
/// close the pool.
pub async fn serve<F>(settings: &Settings, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    Application::prepare(settings).await?.run(settings, shutdown).await
}

impl Application {
    /// Drive the module lifecycle and the server. The pool is closed on
    /// every exit path, including a failed init or start.
    pub async fn run<F>(self, settings: &Settings, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let outcome = self.lifecycle(settings, shutdown).await;
        self.db.close().await;
        outcome
    }

    async fn lifecycle<F>(&self, settings: &Settings, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ctx = InitCtx { settings };

        self.registry.init_all(&ctx).await?;
        self.registry.start_all(&ctx).await?;
        tracing::info!("bookshelf-app bootstrap complete");

        let served = bookshelf_http::start_server(&self.registry, settings, shutdown).await;
        let stopped = self.registry.stop_all().await;

        served.and(stopped)
    }
}

/// Apply pending migrations and exit.
pub async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let app = Application::prepare(settings).await?;
    app.db.close().await;
    Ok(())
}

/// Load the bundled sample catalog. Returns the number of books inserted.
pub async fn seed(settings: &Settings, force: bool) -> anyhow::Result<usize> {
    let app = Application::prepare(settings).await?;
    let repository = books::repository::SqlBookRepository::new(app.db.pool().clone());

    let inserted = books::seed::seed_catalog(&repository, force)
        .await
        .context("failed to seed catalog")?;

    app.db.close().await;
    Ok(inserted)
}
