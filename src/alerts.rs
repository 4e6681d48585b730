//! Operator alerts for error-level log events.
//!
//! [`AlertLayer`] is a `tracing` layer that copies every `ERROR` event into
//! an unbounded channel. The alert forwarder worker drains the channel and
//! posts each alert to the configured webhook, so logging never blocks on
//! the network.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Target of the forwarder's own log events. Events from this target are
/// never turned into alerts.
pub const ALERT_FORWARDER_TARGET: &str = "storefront::alerts::forwarder";

/// JSON document posted to the alert webhook.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub level: String,
    pub target: String,
    pub message: String,
    pub fields: BTreeMap<String, Value>,
    pub timestamp: String,
}

/// A tracing layer that sends error events to a channel.
pub struct AlertLayer {
    sender: mpsc::UnboundedSender<Alert>,
}

impl AlertLayer {
    pub fn new(sender: mpsc::UnboundedSender<Alert>) -> Self {
        Self { sender }
    }

    /// Creates the layer together with the receiving end for the forwarder.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Alert>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl<S> Layer<S> for AlertLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() != Level::ERROR || metadata.target() == ALERT_FORWARDER_TARGET {
            return;
        }

        let mut fields = BTreeMap::new();
        event.record(&mut FieldVisitor(&mut fields));
        let message = match fields.remove("message") {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let alert = Alert {
            level: metadata.level().to_string(),
            target: metadata.target().to_string(),
            message,
            fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        // Receiver gone means alerting is shut down
        let _ = self.sender.send(alert);
    }
}

/// Collects event fields as JSON values.
struct FieldVisitor<'a>(&'a mut BTreeMap<String, Value>);

impl tracing::field::Visit for FieldVisitor<'_> {
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), Value::from(format!("{:?}", value)));
    }
}
