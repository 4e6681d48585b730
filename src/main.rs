use storefront::alerts::AlertLayer;
use storefront::workers::alert_forwarder_worker;
use storefront::{Cache, CacheConfig, build_app_state, build_router, load_config};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    // Error events are only captured when there is a webhook to send them to
    let (alert_layer, alerts) = AlertLayer::channel();
    let alert_layer = config.alerts.webhook_url.is_some().then_some(alert_layer);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("storefront=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(alert_layer)
        .init();

    info!("Loaded configuration:\n{}", config);

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let mut workers = Vec::new();
    if let Some(webhook_url) = config.alerts.webhook_url.clone() {
        workers.push(tokio::spawn(alert_forwarder_worker(
            webhook_url,
            alerts,
            shutdown_tx.subscribe(),
        )));
    }

    let cache = Cache::new_local(CacheConfig::default());
    let state = build_app_state(&config, cache).await?;
    let app = build_router(state);

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    info!("Storefront listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, shutting down workers");
    let _ = shutdown_tx.send(());
    for worker in workers {
        let _ = worker.await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
