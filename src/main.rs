use std::env;

use forum_images::{app, config::AppConfig, config::ConfigError};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::info;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum_images=info,tower_http=info".into()),
        )
        .with(JsonStorageLayer)
        .with(BunyanFormattingLayer::new(
            "forum-images".into(),
            std::io::stdout,
        ))
        .init();

    let config = AppConfig::from_env()?;
    let database_url =
        env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server starting");

    axum::serve(listener, app(db_pool, &config)).await?;
    Ok(())
}
