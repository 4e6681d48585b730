pub mod alerts;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod queries;
pub mod services;
pub mod state;
pub mod validation;
pub mod workers;

pub use cache::{Cache, CacheConfig};
pub use crate::config::Config;
pub use database::{DbConn, DbPool};
pub use error::{Error, Result};
pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use crate::config::{CatalogConfig, StoreBackend};
use services::catalog::{
    ClientCredentialsProvider, CredentialProvider, MoltinCatalog, StaticCredential,
};
use services::dialogue::DialogueEngine;
use services::dispatcher::Dispatcher;
use services::store::{MemoryStore, PgStore, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Load configuration from environment variables
pub fn load_config() -> std::result::Result<Config, Box<dyn std::error::Error>> {
    Ok(Config::load()?)
}

/// Builds the `/api/v1` router.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/events", post(handlers::post_event));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Picks the credential provider the catalog configuration asks for.
///
/// A static token wins over client credentials.
pub fn build_credentials(
    config: &CatalogConfig,
    cache: Cache<String>,
) -> Result<Arc<dyn CredentialProvider>> {
    let provider: Arc<dyn CredentialProvider> = match (
        &config.static_token,
        &config.client_id,
        &config.client_secret,
    ) {
        (Some(token), _, _) => Arc::new(StaticCredential::new(token.clone().into())),
        (None, Some(client_id), Some(client_secret)) => Arc::new(ClientCredentialsProvider::new(
            &config.base_url,
            client_id.clone(),
            client_secret.clone(),
            Duration::from_secs(config.timeout_seconds),
            cache,
        )?),
        _ => {
            return Err(Error::Config(::config::ConfigError::Message(
                "catalog needs either static_token or client_id and client_secret".to_string(),
            )));
        }
    };

    Ok(provider)
}

/// Wires store, catalog client, credentials and engine into the app state.
///
/// The memory store and the access-token cache share `cache`.
pub async fn build_app_state(config: &Config, cache: Cache<String>) -> Result<AppState> {
    let credentials = build_credentials(&config.catalog, cache.clone())?;

    let store: Arc<dyn SessionStore> = match config.store.backend {
        StoreBackend::Memory => Arc::new(MemoryStore::new(cache, config.store.ttl_seconds)),
        StoreBackend::Postgres => Arc::new(PgStore::connect(&config.store.database).await?),
    };

    let catalog = Arc::new(MoltinCatalog::new(
        &config.catalog.base_url,
        Duration::from_secs(config.catalog.timeout_seconds),
        config.catalog.customer_password.clone(),
    )?);

    let engine = DialogueEngine::new(config.dialogue.clone());
    tracing::info!(
        store = ?config.store.backend,
        after_add = ?config.dialogue.after_add,
        serialize_conversations = config.dialogue.serialize_conversations,
        "Dialogue engine ready"
    );

    Ok(AppState::new(Dispatcher::new(
        engine,
        store,
        catalog,
        credentials,
    )))
}
