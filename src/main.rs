use std::sync::Arc;

use reelmood_api::{
    config::Config,
    db::{create_redis_client, Cache},
    models::MoodTables,
    routes::{create_router, AppState},
    services::{transport::Transport, FallbackCatalog, TmdbProvider},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelmood_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let mut transport = Transport::new(
        config.api_key(),
        config.tmdb_api_url.clone(),
        config.retry_policy(),
    );
    if !transport.has_credential() {
        tracing::warn!("TMDB_API_KEY is not set, serving from the fallback catalog only");
    }

    let mut cache_writer = None;
    if let Some(redis_url) = &config.redis_url {
        let (cache, handle) = Cache::new(create_redis_client(redis_url)?);
        transport = transport.with_cache(cache, config.cache_ttl_secs);
        cache_writer = Some(handle);
        tracing::info!(ttl_secs = config.cache_ttl_secs, "Catalog response cache enabled");
    }

    let fallback = Arc::new(FallbackCatalog::bundled()?);
    tracing::info!(movies = fallback.len(), "Loaded fallback catalog");

    let state = Arc::new(AppState::new(
        Arc::new(TmdbProvider::new(transport)),
        fallback,
        Arc::new(MoodTables::standard()),
    ));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
