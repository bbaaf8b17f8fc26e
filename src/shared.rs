use std::sync::Arc;

use crate::relay::EventRelay;
use crate::websockets::{ConnectionManager, InMemoryConnectionManager};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<EventRelay>,
}

impl AppState {
    pub fn new(connection_manager: Arc<dyn ConnectionManager>) -> Self {
        Self {
            relay: Arc::new(EventRelay::new(connection_manager)),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryConnectionManager::new()))
    }
}
