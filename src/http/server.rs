//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the gateway's handlers
//! - Wire up middleware (CORS, tracing, request ID)
//! - Bind server to listener
//! - Serve until the shutdown broadcast fires

use std::sync::Arc;

use axum::{http::Request, routing::get, Json, Router};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayServerConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::notify::{self, TelegramNotifier};
use crate::proxy::{self, ProxyError, ProxyState, UpstreamForwarder};
use crate::security::cors::cors_layer;

pub const HEALTH_PATH: &str = "/healthz";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Proxy(#[from] ProxyError),

    #[error("failed to build notification client: {0}")]
    Notifier(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayServerConfig,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayServerConfig) -> Result<Self, ServerError> {
        let forwarder = UpstreamForwarder::new(&config.upstream)?;
        let notifier = TelegramNotifier::from_config(
            &config.notification,
            reqwest::Client::builder().build()?,
        );
        Ok(Self::from_parts(config, forwarder, notifier))
    }

    /// Assemble from pre-built components.
    pub fn from_parts(
        config: GatewayServerConfig,
        forwarder: UpstreamForwarder,
        notifier: TelegramNotifier,
    ) -> Self {
        let router = Self::build_router(&config, ProxyState::new(forwarder), Arc::new(notifier));
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(
        config: &GatewayServerConfig,
        proxy_state: ProxyState,
        notifier: Arc<TelegramNotifier>,
    ) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(health))
            .merge(notify::router(notifier))
            .merge(proxy::router(proxy_state))
            .layer(cors_layer(&config.cors))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(&X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    request_id = %request_id,
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &GatewayServerConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "Gateway server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("Gateway server stopped");
        Ok(())
    }
}

/// Liveness endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn server() -> GatewayServer {
        let mut config = GatewayServerConfig::default();
        config.upstream.base_url = "http://127.0.0.1:1/remap".into();
        GatewayServer::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let resp = server()
            .router()
            .oneshot(Request::get(HEALTH_PATH).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));
        let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
        assert_eq!(body["status"], "operational");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_caller_request_id_kept() {
        let resp = server()
            .router()
            .oneshot(
                Request::get(HEALTH_PATH)
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.headers()["x-request-id"], "abc-123");
    }

    #[tokio::test]
    async fn test_reserved_path_not_found() {
        let resp = server()
            .router()
            .oneshot(Request::get("/api/telegram/other").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_preflight_answered_locally() {
        let resp = server()
            .router()
            .oneshot(
                Request::options("/api/entity/product")
                    .header("origin", "http://localhost:8081")
                    .header("access-control-request-method", "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.status().is_success());
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    }
}
