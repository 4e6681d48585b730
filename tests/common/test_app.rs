use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use storefront::config::DialogueConfig;
use storefront::services::catalog::{Credential, StaticCredential};
use storefront::services::dialogue::DialogueEngine;
use storefront::services::dispatcher::Dispatcher;
use storefront::services::store::MemoryStore;
use storefront::{AppState, Cache, CacheConfig, build_router};
use tokio::net::TcpListener;

use super::FakeCatalog;

/// Options for building a test application
#[derive(Debug, Clone, Default)]
pub struct TestAppOptions {
    pub dialogue: DialogueConfig,
}

/// Storefront wired to a fake catalog and the in-memory store
///
/// The dispatcher is usable directly; `serve` additionally exposes the HTTP
/// API on a random port.
pub struct TestApp {
    pub dispatcher: Arc<Dispatcher>,
    pub store: MemoryStore,
    pub catalog: Arc<FakeCatalog>,
    /// Server base URL (e.g., "http://127.0.0.1:54321"), set by `serve`
    pub address: String,
    pub client: Client,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_options(TestAppOptions::default()).await
    }

    pub async fn with_options(options: TestAppOptions) -> Self {
        let store = MemoryStore::new(Cache::new_local(CacheConfig::default()), None);
        let catalog = Arc::new(FakeCatalog::new());

        let dispatcher = Dispatcher::new(
            DialogueEngine::new(options.dialogue),
            Arc::new(store.clone()),
            catalog.clone(),
            Arc::new(StaticCredential::new(Credential::new("test-token"))),
        );

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            dispatcher: Arc::new(dispatcher),
            store,
            catalog,
            address: String::new(),
            client,
        }
    }

    /// Starts the HTTP API on a random port
    pub async fn serve(mut self) -> Self {
        let app = build_router(AppState {
            dispatcher: Arc::clone(&self.dispatcher),
        });

        // Bind to random port (port 0 tells OS to assign available port)
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        self.address = format!("http://127.0.0.1:{port}");

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        self
    }

    /// Get the full URL for an API endpoint
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Posts an event to `/api/v1/events`
    pub async fn post_event(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/v1/events"))
            .json(&body)
            .send()
            .await
            .expect("Failed to send event")
    }
}
