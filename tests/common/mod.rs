//! Shared utilities for integration testing.
//!
//! In-process mock servers bound to `127.0.0.1:0` that record every request
//! they receive.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{to_bytes, Bytes},
    extract::Request,
    http::{HeaderMap, Method},
    response::Response,
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use inventory_gateway::config::GatewayServerConfig;
use inventory_gateway::{GatewayServer, Shutdown};

/// One request as seen by a mock server.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    /// Path plus raw query.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Captured {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl Recorder {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Captured {
        self.requests.lock().unwrap().last().cloned().expect("no request recorded")
    }

    pub fn all(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, captured: Captured) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(captured);
    }
}

pub struct MockServer {
    pub addr: SocketAddr,
    pub recorder: Recorder,
}

impl MockServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a mock whose every response is produced by `respond`.
pub async fn start_mock<F>(respond: F) -> MockServer
where
    F: Fn(&Captured) -> Response + Send + Sync + 'static,
{
    start_delayed_mock(Duration::ZERO, respond).await
}

/// Like [`start_mock`], but every response is held back for `delay`.
pub async fn start_delayed_mock<F>(delay: Duration, respond: F) -> MockServer
where
    F: Fn(&Captured) -> Response + Send + Sync + 'static,
{
    let recorder = Recorder::default();
    let respond = Arc::new(respond);

    let rec = recorder.clone();
    let app = Router::new().fallback(move |request: Request| {
        let rec = rec.clone();
        let respond = respond.clone();
        async move {
            let (parts, body) = request.into_parts();
            let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
            let captured = Captured {
                method: parts.method,
                uri: parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_default(),
                headers: parts.headers,
                body,
            };
            rec.record(captured.clone());
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            respond(&captured)
        }
    });

    let addr = spawn_router(app).await;
    MockServer { addr, recorder }
}

/// Start a raw TCP backend that writes `response` verbatim and closes,
/// for responses no well-behaved server would produce.
pub async fn start_raw_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing is listening on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Running gateway; dropping the handle shuts it down.
pub struct GatewayHandle {
    pub addr: SocketAddr,
    _shutdown: Shutdown,
}

impl GatewayHandle {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_gateway(config: GatewayServerConfig) -> GatewayHandle {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = GatewayServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    GatewayHandle {
        addr,
        _shutdown: shutdown,
    }
}

/// Gateway config pointing the mirrored prefix at `upstream`.
pub fn gateway_config(upstream: &str) -> GatewayServerConfig {
    let mut config = GatewayServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = upstream.to_string();
    config.upstream.user_agent = "inventory-gateway/test".into();
    config
}

/// HTTP client that leaves compressed bodies alone.
pub fn raw_client() -> reqwest::Client {
    reqwest::Client::builder().no_gzip().build().unwrap()
}
