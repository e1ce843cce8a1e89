//! Replace the course category table with the fixed list.

use course_market::store::PgCategoryStore;
use course_market::{ensure_database_exists, ensure_tables, seed_categories, server_config_from_env};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = server_config_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("course_market=info")))
        .init();

    ensure_database_exists(&config.database_url).await?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;
    ensure_tables(&pool).await?;

    let inserted = seed_categories(&PgCategoryStore::new(pool.clone())).await?;
    println!("seeded {} course categories", inserted);
    pool.close().await;
    Ok(())
}
