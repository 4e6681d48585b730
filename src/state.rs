use crate::services::dispatcher::Dispatcher;
use std::sync::Arc;

/// Application state shared across all HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Runs inbound events through the dialogue engine
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}
