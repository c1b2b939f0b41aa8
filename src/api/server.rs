//! HTTP Server implementation
//!
//! This module provides the HTTP server using Axum framework with:
//! - Configurable host/port binding
//! - Per-client rate limiting ahead of every handler
//! - Request ids, request tracing and CORS
//! - Graceful shutdown handling

use crate::api::handlers::AppState;
use crate::api::middleware::{rate_limit_middleware, request_id_middleware, RateLimiter};
use crate::api::routes::build_api_routes;
use crate::core::config::{Config, ServerConfig};
use crate::core::services::RestaurantService;
use crate::db::manager::DatabaseManager;
use crate::db::repository::{RestaurantRepository, RestaurantStore};
use axum::{http::HeaderValue, middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
    rate_limiter: Option<RateLimiter>,
}

impl ApiServer {
    /// Create a new API server backed by the SQLite store
    pub fn new(config: Config, db: Arc<DatabaseManager>) -> Self {
        Self::with_repository(config, Arc::new(RestaurantRepository::new(db)))
    }

    /// Create a new API server on top of any restaurant store
    pub fn with_repository(config: Config, repo: Arc<RestaurantStore>) -> Self {
        let rate_limiter = config.security.rate_limit_enabled.then(|| {
            RateLimiter::new(
                config.security.rate_limit_requests,
                config.security.rate_limit_window,
            )
            .with_trusted_proxy_headers(config.security.trust_proxy_headers)
        });

        let router = Self::build_router(&config, repo, rate_limiter.clone());

        Self {
            router,
            config: config.server,
            rate_limiter,
        }
    }

    /// Build the Axum router with all routes and middleware
    fn build_router(
        config: &Config,
        repo: Arc<RestaurantStore>,
        rate_limiter: Option<RateLimiter>,
    ) -> Router {
        let app_state = AppState {
            restaurant_service: Arc::new(RestaurantService::new(repo)),
        };

        let mut router = build_api_routes(app_state);

        // Admission filter sits closest to the routes so rejected requests
        // still get a request id, a trace span and CORS headers
        if let Some(limiter) = rate_limiter {
            router = router.layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(Self::build_cors_layer(&config.security.allowed_origins)),
        )
    }

    /// Build CORS layer from allowed origins configuration
    fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
        let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        if allowed_origins.iter().any(|origin| origin == "*") {
            cors.allow_origin(Any)
        } else {
            let origins: Vec<HeaderValue> = allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            cors.allow_origin(origins)
        }
    }

    /// Start the HTTP server and listen for requests
    ///
    /// This method will block until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            rate_limited = self.rate_limiter.is_some(),
            "Starting HTTP server"
        );

        if let Some(limiter) = self.rate_limiter.clone() {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(limiter.window());
                loop {
                    interval.tick().await;
                    limiter.cleanup_expired().await;
                }
            });
        }

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Get a reference to the router
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::ABOUT_TEXT;
    use crate::api::middleware::{
        RATE_LIMIT_LIMIT_HEADER, RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER,
        REQUEST_ID_HEADER,
    };
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::util::ServiceExt; // For oneshot method

    fn server(configure: impl FnOnce(&mut Config)) -> ApiServer {
        let mut config = Config::defaults().unwrap();
        configure(&mut config);
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        ApiServer::new(config, db)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_fixed_text_routes() {
        let router = server(|_| {}).router().clone();

        let response = router.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Hello from Node.js!");

        let response = router.oneshot(get("/about")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, ABOUT_TEXT);
    }

    #[tokio::test]
    async fn test_default_quota_headers() {
        let router = server(|_| {}).router().clone();

        let response = router.oneshot(get("/restaurants")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers.get(RATE_LIMIT_LIMIT_HEADER).unwrap(), "100");
        assert_eq!(headers.get(RATE_LIMIT_REMAINING_HEADER).unwrap(), "99");
        assert_eq!(headers.get(RATE_LIMIT_RESET_HEADER).unwrap(), "900");
        assert!(headers.contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_quota_applies_across_all_routes() {
        let mut config = Config::defaults().unwrap();
        config.security.rate_limit_requests = 2;
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let router = ApiServer::new(config, db.clone()).router().clone();

        assert_eq!(router.clone().oneshot(get("/")).await.unwrap().status(), StatusCode::OK);
        assert_eq!(
            router.clone().oneshot(get("/about")).await.unwrap().status(),
            StatusCode::OK
        );

        let create = Request::builder()
            .method(Method::POST)
            .uri("/restaurants")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"name":"Pasta Place","cuisine":"Italian","rating":4.5}"#,
            ))
            .unwrap();
        let response = router.oneshot(create).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        // The rejected create never reached the handler
        let count: i64 = db
            .execute(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM restaurants", [], |row| row.get(0))?)
            })
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_rate_limit_can_be_disabled() {
        let router = server(|config| {
            config.security.rate_limit_enabled = false;
            config.security.rate_limit_requests = 1;
        })
        .router()
        .clone();

        for _ in 0..3 {
            let response = router.clone().oneshot(get("/restaurants")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(!response.headers().contains_key(RATE_LIMIT_REMAINING_HEADER));
        }
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let router = server(|config| {
            config.security.allowed_origins = vec!["http://localhost:5173".to_string()];
        })
        .router()
        .clone();

        let request = Request::builder()
            .uri("/restaurants")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let router = server(|_| {}).router().clone();
        let response = router.oneshot(get("/menus")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
