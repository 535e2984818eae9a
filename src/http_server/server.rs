//! # HTTP Server
//!
//! Combines all routers, CORS and request logging into one axum app.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::crm_routes::crm_routes;
use super::email_routes::email_routes;
use super::health_routes::health_routes;
use super::middleware::log_requests;
use super::state::AppState;
use super::stats_routes::stats_routes;
use crate::observability::{Event, Logger};

/// HTTP server for the CRM API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, Arc::new(state));
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
        let cors = if config.permits_any_origin() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<HeaderValue> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes(state.clone()))
            .merge(crm_routes(state.clone()))
            .merge(email_routes(state.clone()))
            .nest("/stats", stats_routes(state))
            .layer(axum::middleware::from_fn(log_requests))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        Logger::info(Event::Serving.as_str(), &[("addr", addr.to_string().as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed the server simply runs until killed
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::StorageGateway;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    #[test]
    fn test_server_with_custom_port() {
        let state = AppState::new(StorageGateway::unavailable("test"));
        let server = HttpServer::new(HttpServerConfig::with_port(8080), state);
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    async fn allow_origin_header(config: HttpServerConfig, origin: &str) -> Option<String> {
        let state = AppState::new(StorageGateway::unavailable("test"));
        let router = HttpServer::new(config, state).router();

        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_empty_origin_list_allows_any_origin() {
        let allowed = allow_origin_header(HttpServerConfig::default(), "http://app.example").await;
        assert_eq!(allowed.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn test_origin_list_echoes_only_listed_origins() {
        let config = HttpServerConfig {
            cors_origins: vec!["http://localhost:5173".to_string()],
            ..Default::default()
        };

        let listed = allow_origin_header(config.clone(), "http://localhost:5173").await;
        assert_eq!(listed.as_deref(), Some("http://localhost:5173"));

        let other = allow_origin_header(config, "http://evil.example").await;
        assert!(other.is_none());
    }
}
