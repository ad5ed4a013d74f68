mod api;
mod config;
mod db;
mod middleware;
mod models;
mod schema;
mod store;
mod telemetry;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use recetas_core::{create_provider, MemoryStore, RecipeService, RecipeStore};

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::store::PgRecipeStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        let spec = api::openapi()
            .to_pretty_json()
            .context("Failed to serialize OpenAPI spec")?;
        println!("{}", spec);
        return Ok(());
    }

    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    telemetry::init_telemetry()?;

    let config = ServerConfig::from_env()?;

    let store: Arc<dyn RecipeStore> = match &config.database_url {
        Some(database_url) => {
            let url = database_url.clone();
            let pool = tokio::task::spawn_blocking(move || db::create_pool(&url))
                .await
                .context("Database setup task failed")??;
            Arc::new(PgRecipeStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, recipes are kept in memory and lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let provider = create_provider(&config.generator).context("Failed to create generator")?;
    tracing::info!(
        provider = provider.provider_name(),
        model = provider.model_name(),
        store = store.backend_name(),
        environment = %config.environment,
        "Recipe service configured"
    );

    let recipes = RecipeService::new(Arc::from(provider), store)
        .with_generation_timeout(config.generator.timeout);

    let state = AppState {
        recipes,
        environment: config.environment,
    };
    let app = api::router(state, &config.http);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let local_addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);
    tracing::info!(
        "OpenAPI spec available at http://{}/api-docs/openapi.json",
        local_addr
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
