use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rig_builder::{
    config::Config,
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle},
    routes::{create_router, AppState},
    services::{
        CachingExplainer, Catalog, Explainer, OpenAiExplainer, ProfileTables, Recommender,
        SqliteCatalogSource, TemplateExplainer,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rig_builder=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .with_context(|| format!("Failed to open parts database {}", config.database_url))?;
    let catalog = Catalog::load(&SqliteCatalogSource::new(pool.clone())).await?;
    // The catalog is held in memory from here on
    pool.close().await;

    let tables = match &config.profile_tables_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading profile tables");
            ProfileTables::from_json_file(path)?
        }
        None => ProfileTables::default(),
    };

    let recommender =
        Recommender::new(catalog, tables).with_candidate_limit(config.candidate_limit);

    let (explainer, cache_writer) = build_explainer(&config)?;
    tracing::info!(explainer = explainer.name(), "Explainer ready");

    let state = Arc::new(AppState::from_config(&config, recommender, explainer));
    let app = create_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

/// Picks the explainer from the configuration, wrapping it with the Redis cache when enabled
fn build_explainer(
    config: &Config,
) -> anyhow::Result<(Arc<dyn Explainer>, Option<CacheWriterHandle>)> {
    let explainer: Arc<dyn Explainer> = match &config.openai_api_key {
        Some(api_key) if !api_key.trim().is_empty() => Arc::new(OpenAiExplainer::new(
            api_key.clone(),
            config.openai_api_url.clone(),
            config.openai_model.clone(),
        )),
        _ => {
            tracing::warn!("OPENAI_API_KEY not set, using template explanations");
            Arc::new(TemplateExplainer)
        }
    };

    let Some(redis_url) = &config.redis_url else {
        return Ok((explainer, None));
    };

    let client = create_redis_client(redis_url)?;
    let (cache, handle) = Cache::new(client);
    tracing::info!("Explanation caching enabled");

    Ok((Arc::new(CachingExplainer::new(explainer, cache)), Some(handle)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
