//! recetario - recipe catalog command-line tool

use anyhow::{Context, Result};
use clap::Parser;
use recetario::cli::{Cli, Session};
use recetario::preferences::ThemePreferences;
use recetario::{RecipeCatalog, RecipeRepository};
use recetario_common::config::{default_config_path, AppConfig, RootFolderInitializer};
use recetario_common::db::{init_database, RecipeStore};
use recetario_common::EventBus;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_file = cli.config.clone().or_else(default_config_path);
    let config = AppConfig::resolve(cli.root_folder.clone(), config_file.as_deref());

    // RUST_LOG wins over the configured level; logs go to stderr so stdout stays clean
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(
        "Starting recetario v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    debug!("Resolved configuration: {:?}", config);

    RootFolderInitializer::new(config.root_folder.clone())
        .ensure_directory_exists()
        .context("Failed to create root folder")?;

    let pool = init_database(&config.database_path)
        .await
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    let events = EventBus::default();
    let repo = RecipeRepository::new(RecipeStore::new(pool.clone(), events.clone()));

    if config.seed_demo_data {
        let seeded = repo.seed_if_empty().await?;
        if seeded > 0 {
            info!("First run: {} demo recipes available", seeded);
        }
    }

    let mut session = Session {
        catalog: RecipeCatalog::new(repo),
        preferences: ThemePreferences::new(pool.clone(), events),
        json: cli.json,
    };

    let mut stdout = std::io::stdout().lock();
    let outcome = session.execute(cli.command, &mut stdout).await;

    drop(session);
    pool.close().await;
    outcome
}
