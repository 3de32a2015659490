use seo_copywriter::{
    catalog::CatalogClient,
    config::AppConfig,
    gemini::GeminiClient,
    imaging::ImageFetcher,
    pipeline::ContentPipeline,
    routes::{router, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match &config.gemini.api_key {
        Some(key) => tracing::info!("Using API key: {}...", key.chars().take(10).collect::<String>()),
        None => tracing::warn!("⚠️ GEMINI_API_KEY not set; generation requests will fail"),
    }
    tracing::info!("Catalog source: {}", config.catalog.url);

    let state = AppState {
        catalog: Arc::new(CatalogClient::new(&config.catalog)),
        pipeline: ContentPipeline::new(Arc::new(GeminiClient::new(&config.gemini))),
        images: Arc::new(ImageFetcher::new(&config.image)),
    };

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
