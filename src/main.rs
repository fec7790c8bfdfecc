use anyhow::Context;
use formulation_api::config::Config;
use formulation_api::routes;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing/logging
    tracing_subscriber::fmt::init();
    tracing::info!("Starting server...");

    // Load configuration and environment variables to pass to the application
    let config: Config = Config::from_env()?;

    let db: DatabaseConnection = Database::connect(config.db_url.as_str())
        .await
        .context("Could not connect to the database")?;
    db.ping().await.context("Database did not answer ping")?;
    tracing::info!("Connected to the database");

    Migrator::up(&db, None)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("DB migrations complete");

    tracing::info!(
        "Starting server {} ({} deployment) ...",
        config.app_name,
        config.deployment.to_uppercase()
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Could not bind {}", config.listen_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let router = routes::build_router(&db, &config);
    axum::serve(listener, router.into_make_service()).await?;

    Ok(())
}
