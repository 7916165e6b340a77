use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use meal_planner_api::{
    api::{create_router, AppState},
    config::Config,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("meal_planner_api=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    // The catalog must load before anything is served
    let state = AppState::from_config(&config)
        .with_context(|| format!("failed to load catalog from {}", config.catalog_path))?;

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
