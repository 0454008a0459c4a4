//! Tally API Server
//!
//! Main entry point for the Tally budgeting backend.

use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router};
use tally_db::{Migrator, connect_with, seed_defaults};
use tally_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_server=debug,tally_api=debug,tally_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with(&config.database).await?;
    info!(url = %config.database.url, "Connected to database");

    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    if config.database.seed_defaults {
        let report = seed_defaults(&db).await?;
        info!(
            categories = report.categories,
            groups = report.groups,
            keywords = report.keywords,
            "Default data seeded"
        );
    }

    let mut state = AppState::new(db);
    state.max_upload_bytes = config.import.max_upload_bytes;
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
