//! Seeds default categories, groups and merchant keywords.
//!
//! Runs pending migrations first. Tables that already hold rows are left alone.
//!
//! Usage: cargo run --bin seeder

use sea_orm_migration::MigratorTrait;
use tally_db::{Migrator, connect_with, seed_defaults};
use tally_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    println!("Connecting to {}...", config.database.url);
    let db = connect_with(&config.database).await?;
    Migrator::up(&db, None).await?;

    println!("Seeding defaults...");
    let report = seed_defaults(&db).await?;
    println!(
        "Seeding complete: {} categories, {} groups, {} keywords",
        report.categories, report.groups, report.keywords
    );

    Ok(())
}
