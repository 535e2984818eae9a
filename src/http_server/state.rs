//! Shared handler state

use crate::gateway::StorageGateway;

/// State injected into every handler
pub struct AppState {
    pub gateway: StorageGateway,
    /// Whether a connection string was configured at all
    pub database_url_set: bool,
    /// Name reported by diagnostics; falls back to the store's own name
    pub database_name: Option<String>,
}

impl AppState {
    pub fn new(gateway: StorageGateway) -> Self {
        let database_url_set = gateway.is_connected();
        Self {
            gateway,
            database_url_set,
            database_name: None,
        }
    }

    pub fn with_database_url_set(mut self, set: bool) -> Self {
        self.database_url_set = set;
        self
    }

    pub fn with_database_name(mut self, name: Option<String>) -> Self {
        self.database_name = name;
        self
    }
}
