//! # HTTP API
//!
//! Axum server exposing the CRM collections.
//!
//! # Endpoints
//!
//! - `GET /`, `GET /test` - liveness and storage diagnostics
//! - `POST|GET /contacts`, `/companies`, `/deals`, `/activities`
//! - `POST /email/campaigns`, `POST /email/send`
//! - `GET /stats/summary`

pub mod config;
pub mod crm_routes;
pub mod email_routes;
pub mod errors;
pub mod extract;
pub mod health_routes;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;
pub mod stats_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
pub use state::AppState;
