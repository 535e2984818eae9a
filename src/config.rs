//! Process configuration
//!
//! Resolved once at startup from CLI flags, which fall back to the
//! environment (`HOST`, `PORT`, `DATABASE_URL`, `DATABASE_NAME`,
//! `CORS_ORIGINS`, `LOG_LEVEL`).

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;

/// Complete backend configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    /// Store connection string. Absent means the store is unavailable.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Name reported by diagnostics
    #[serde(default)]
    pub database_name: Option<String>,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            database_url: None,
            database_name: None,
        }
    }
}

impl CrmConfig {
    /// Check the values that cannot be caught by argument parsing.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.host.trim().is_empty() {
            return Err("host must not be empty".to_string());
        }
        if let Some(url) = &self.database_url {
            if url.trim().is_empty() {
                return Err("DATABASE_URL is set but empty".to_string());
            }
        }
        for origin in &self.server.cors_origins {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(format!("invalid CORS origin '{}'", origin));
            }
        }
        Ok(())
    }

    pub fn database_url_set(&self) -> bool {
        self.database_url.is_some()
    }
}
