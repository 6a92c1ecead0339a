use anyhow::Context;
use clap::{Parser, Subcommand};

use bookshelf_kernel::settings::Settings;

/// Administrative entrypoint for the bookshelf service
#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about)]
struct Cli {
    /// Override the configured database URL
    #[arg(long, global = true, env = "BOOKSHELF_DATABASE__URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API until interrupted
    Serve,
    /// Apply pending schema migrations
    Migrate,
    /// Load the bundled sample catalog
    Seed {
        /// Insert even when the catalog already holds books
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }
    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, command = ?cli.command, "bookshelf cli");

    match cli.command {
        Command::Serve => {
            bookshelf_app::bootstrap::serve(&settings, bookshelf_http::shutdown_signal()).await
        }
        Command::Migrate => {
            bookshelf_app::bootstrap::migrate(&settings).await?;
            println!("migrations applied to {}", settings.database.url);
            Ok(())
        }
        Command::Seed { force } => {
            let inserted = bookshelf_app::bootstrap::seed(&settings, force).await?;
            println!("inserted {inserted} books");
            Ok(())
        }
    }
}
