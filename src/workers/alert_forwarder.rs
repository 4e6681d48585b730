use crate::alerts::{ALERT_FORWARDER_TARGET, Alert};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

/// Background worker that posts alerts to the operator webhook
///
/// Runs until shutdown is broadcast or every alert sender is gone. Delivery
/// failures are logged at warn level and the alert is dropped.
pub async fn alert_forwarder_worker(
    webhook_url: String,
    mut alerts: mpsc::UnboundedReceiver<Alert>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(target: ALERT_FORWARDER_TARGET, "Failed to create alert HTTP client: {}", e);
            return;
        }
    };
    info!(target: ALERT_FORWARDER_TARGET, "Alert forwarder started");

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!(target: ALERT_FORWARDER_TARGET, "Alert forwarder shutting down");
                break;
            }
            alert = alerts.recv() => {
                let Some(alert) = alert else {
                    break;
                };

                match client.post(&webhook_url).json(&alert).send().await {
                    Ok(response) if response.status().is_success() => {}
                    Ok(response) => {
                        warn!(
                            target: ALERT_FORWARDER_TARGET,
                            status = %response.status(),
                            "Alert webhook rejected alert"
                        );
                    }
                    Err(e) => {
                        warn!(target: ALERT_FORWARDER_TARGET, "Failed to deliver alert: {}", e);
                    }
                }
            }
        }
    }

    info!(target: ALERT_FORWARDER_TARGET, "Alert forwarder stopped");
}
