use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use reel_picker::{
    api::{create_router, AppState},
    config::Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reel_picker=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.credential().is_none() {
        tracing::warn!("TMDB_API_KEY is not set; every catalog request will fail until it is");
    }

    let state = AppState::from_config(&config).context("Failed to initialize application state")?;
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!(
        address = %address,
        data_dir = %config.data_dir.display(),
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
