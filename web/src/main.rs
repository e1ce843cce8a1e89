//! Web frontend process. Signup and credential checks go straight to the database;
//! everything else is fetched from the API service.
//!
//! Run from repo root: `cargo run -p course-market-web`

mod app;

use app::{web_router, WebState};
use course_market::{ensure_database_exists, ensure_tables, web_config_from_env, ApiClient};
use course_market::store::PgUserStore;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("course_market=info,course_market_web=info")),
        )
        .init();

    let config = web_config_from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    ensure_tables(&pool).await?;

    let state = WebState {
        users: Arc::new(PgUserStore::new(pool)),
        api: ApiClient::from_config(&config)?,
        env: config.env,
    };

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(
        "web frontend listening on http://{} (api at {}, env {})",
        listener.local_addr()?,
        config.api_url,
        config.env
    );
    axum::serve(listener, web_router(state)).await?;
    Ok(())
}
