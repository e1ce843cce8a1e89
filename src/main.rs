//! API service: ensures the database and tables exist, then serves the REST API and `/docs`.

use course_market::{api_router, ensure_database_exists, ensure_tables, server_config_from_env, AppState};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = server_config_from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("course_market=info")))
        .init();

    ensure_database_exists(&config.database_url).await?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    ensure_tables(&pool).await?;

    let app = api_router(AppState::from_pool(pool));
    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("listening on {}, docs at /docs", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
