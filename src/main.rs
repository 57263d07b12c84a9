use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use sentinel_admin::app::{app, AppState};
use sentinel_admin::config::{self, AppConfig, Environment};
use sentinel_admin::database::{DatabaseManager, MemoryStore, Store};
use sentinel_admin::resources::Resources;

const MEMORY_DATABASE: &str = "memory";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, JWT_SECRET etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = config::config();
    config.validate()?;
    tracing::info!("Starting Sentinel Admin in {:?} mode", config.environment);

    let resources = Arc::new(Resources::load(config.resources.path.as_deref())?);

    if config.database.url.as_deref() == Some(MEMORY_DATABASE) {
        tracing::warn!("Using the in-memory store; data is lost on exit");
        serve(MemoryStore::new(), config, resources).await
    } else {
        let store = DatabaseManager::connect(&config.database).await?;
        DatabaseManager::migrate(&store).await?;
        serve(store, config, resources).await
    }
}

async fn serve<S: Store>(
    store: S,
    config: &AppConfig,
    resources: Arc<Resources>,
) -> anyhow::Result<()> {
    let state = AppState::build(store, resources, config.security.authorization_enabled).await?;
    let app = app(state).layer(cors_layer(config));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Sentinel Admin listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
